//! InterestPoll aggregate - gauges whether enough members want a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::DomainError;
use crate::ids::{PollId, UserId};

/// Result of recording one interest signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTally {
    /// Signal came from a bot and does not count
    IgnoredBot,
    /// This member was already counted
    Duplicate { count: u32 },
    /// Counted, threshold not yet reached
    Counted { count: u32 },
    /// This signal brought the count to the threshold
    ThresholdReached { count: u32 },
}

/// An open poll counting distinct non-bot members.
///
/// # Invariants
///
/// - `threshold >= 1`
/// - each member counts at most once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestPoll {
    id: PollId,
    threshold: u32,
    opened_by: UserId,
    opened_at: DateTime<Utc>,
    voters: BTreeSet<UserId>,
}

impl InterestPoll {
    pub fn open(
        threshold: u32,
        opened_by: UserId,
        opened_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if threshold == 0 {
            return Err(DomainError::validation(
                "Poll threshold must be at least 1",
            ));
        }
        Ok(Self {
            id: PollId::new(),
            threshold,
            opened_by,
            opened_at,
            voters: BTreeSet::new(),
        })
    }

    pub fn id(&self) -> PollId {
        self.id
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn opened_by(&self) -> &UserId {
        &self.opened_by
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn count(&self) -> u32 {
        u32::try_from(self.voters.len()).unwrap_or(u32::MAX)
    }

    pub fn record(&mut self, voter: UserId, is_bot: bool) -> PollTally {
        if is_bot {
            return PollTally::IgnoredBot;
        }
        if !self.voters.insert(voter) {
            return PollTally::Duplicate {
                count: self.count(),
            };
        }
        let count = self.count();
        if count == self.threshold {
            PollTally::ThresholdReached { count }
        } else {
            PollTally::Counted { count }
        }
    }

    /// Returns whether the member had been counted.
    pub fn withdraw(&mut self, voter: &UserId) -> bool {
        self.voters.remove(voter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn poll(threshold: u32) -> InterestPoll {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        InterestPoll::open(threshold, user("host"), now).unwrap()
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert!(InterestPoll::open(0, user("host"), now).is_err());
    }

    #[test]
    fn counts_distinct_humans_until_threshold() {
        let mut poll = poll(2);
        assert_eq!(poll.record(user("a"), false), PollTally::Counted { count: 1 });
        assert_eq!(poll.record(user("bot"), true), PollTally::IgnoredBot);
        assert_eq!(poll.record(user("a"), false), PollTally::Duplicate { count: 1 });
        assert_eq!(
            poll.record(user("b"), false),
            PollTally::ThresholdReached { count: 2 }
        );
    }

    #[test]
    fn withdrawn_vote_no_longer_counts() {
        let mut poll = poll(2);
        poll.record(user("a"), false);
        assert!(poll.withdraw(&user("a")));
        assert!(!poll.withdraw(&user("a")));
        assert_eq!(poll.count(), 0);
        assert_eq!(poll.record(user("a"), false), PollTally::Counted { count: 1 });
    }
}
