//! Interest signal use cases.

use serde::Serialize;
use std::sync::Arc;

use tablehost_domain::{PollId, PollTally, SessionUrl, UserId};

use crate::infrastructure::ports::AdapterError;
use crate::stores::SessionSlot;

use super::{CreateSession, LifecycleError};

/// Result of one interest signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InterestOutcome {
    /// Bot vote, or a vote on a poll that is no longer open
    Ignored,
    Counted { count: u32, threshold: u32 },
    AlreadyCounted { count: u32, threshold: u32 },
    /// This vote reached the threshold and the session is now live
    SessionStarted { url: SessionUrl },
}

/// Count interest on the open poll, creating the session at the threshold.
pub struct RecordInterest {
    slot: Arc<SessionSlot>,
    create: Arc<CreateSession>,
    threshold: u32,
}

impl RecordInterest {
    pub fn new(slot: Arc<SessionSlot>, create: Arc<CreateSession>, threshold: u32) -> Self {
        Self {
            slot,
            create,
            threshold,
        }
    }

    pub async fn execute(
        &self,
        poll_id: PollId,
        voter: &UserId,
        is_bot: bool,
    ) -> Result<InterestOutcome, LifecycleError> {
        let Some(tally) = self
            .slot
            .record_interest(poll_id, voter.clone(), is_bot)
            .await
        else {
            tracing::debug!(%poll_id, voter = %voter, "Interest on a poll that is not open");
            return Ok(InterestOutcome::Ignored);
        };

        let threshold = self.threshold;
        match tally {
            PollTally::IgnoredBot => Ok(InterestOutcome::Ignored),
            PollTally::Duplicate { count } => {
                Ok(InterestOutcome::AlreadyCounted { count, threshold })
            }
            PollTally::Counted { count } => {
                tracing::debug!(%poll_id, count, threshold, "Interest counted");
                Ok(InterestOutcome::Counted { count, threshold })
            }
            PollTally::ThresholdReached { count } => {
                tracing::info!(%poll_id, count, "Interest threshold reached, creating session");
                // The task owns the slot until it is published or released,
                // even if this caller goes away.
                let create = Arc::clone(&self.create);
                match tokio::spawn(async move { create.execute().await }).await {
                    Ok(created) => Ok(InterestOutcome::SessionStarted { url: created? }),
                    Err(e) => {
                        tracing::error!(error = %e, "Session creation task failed");
                        self.slot.abort_creating().await;
                        Err(LifecycleError::CreationFailed(AdapterError::automation(e)))
                    }
                }
            }
        }
    }

    /// Take back a vote while the poll is still open. Returns the new count,
    /// or `None` when the poll is no longer open.
    pub async fn withdraw(&self, poll_id: PollId, voter: &UserId) -> Option<u32> {
        self.slot.withdraw_interest(poll_id, voter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        AdmitOutcome, CreatedSession, MockSessionRepo, MockTableAdapter, SessionConfig, SessionHandle,
        TableAdapter,
    };
    use crate::test_fixtures::{clock, dollars, fixed_now, session_url, user};
    use crate::use_cases::lifecycle::{Operators, StartInterestPoll};
    use async_trait::async_trait;
    use std::time::Duration;
    use tablehost_domain::{Money, SessionStatus, TableName};
    use tokio::sync::Notify;

    /// Adapter whose session creation waits until released.
    struct GatedCreate {
        release: Notify,
        answer: fn() -> Result<CreatedSession, AdapterError>,
    }

    impl GatedCreate {
        fn new(answer: fn() -> Result<CreatedSession, AdapterError>) -> Arc<Self> {
            Arc::new(Self {
                release: Notify::new(),
                answer,
            })
        }
    }

    #[async_trait]
    impl TableAdapter for GatedCreate {
        async fn create_session(
            &self,
            _config: &SessionConfig,
        ) -> Result<CreatedSession, AdapterError> {
            self.release.notified().await;
            (self.answer)()
        }

        async fn admit_player(
            &self,
            _session: &SessionHandle,
            _table_name: &TableName,
            _expected_stack: Money,
        ) -> Result<AdmitOutcome, AdapterError> {
            Err(AdapterError::automation("not used"))
        }

        async fn remove_player(
            &self,
            _session: &SessionHandle,
            _table_name: &TableName,
        ) -> Result<Money, AdapterError> {
            Err(AdapterError::automation("not used"))
        }
    }

    struct Harness {
        slot: Arc<SessionSlot>,
        start: StartInterestPoll,
        interest: RecordInterest,
    }

    fn harness(
        threshold: u32,
        adapter: Arc<dyn TableAdapter>,
        sessions: MockSessionRepo,
    ) -> Harness {
        let slot = Arc::new(SessionSlot::new());
        let create = Arc::new(CreateSession::new(
            Arc::clone(&slot),
            adapter,
            Arc::new(sessions),
            SessionConfig {
                game_name: "Friday".into(),
                small_blind: dollars(0.1),
                big_blind: dollars(0.2),
            },
            clock(),
        ));
        Harness {
            start: StartInterestPoll::new(
                Arc::clone(&slot),
                Operators::new([user("host")]),
                threshold,
                clock(),
            ),
            interest: RecordInterest::new(Arc::clone(&slot), create, threshold),
            slot,
        }
    }

    fn creating_adapter() -> MockTableAdapter {
        let mut adapter = MockTableAdapter::new();
        adapter.expect_create_session().times(1).returning(|_| {
            Ok(CreatedSession {
                handle: SessionHandle::new("h1"),
                url: session_url(),
            })
        });
        adapter
    }

    fn recording_sessions() -> MockSessionRepo {
        let mut sessions = MockSessionRepo::new();
        sessions
            .expect_create_game_record()
            .withf(|game| game.created_at() == fixed_now())
            .times(1)
            .returning(|_| Ok(()));
        sessions
    }

    #[tokio::test]
    async fn reaching_threshold_goes_polling_creating_active() {
        let h = harness(2, Arc::new(creating_adapter()), recording_sessions());
        let poll = h.start.execute(&user("host")).await.unwrap();

        let first = h
            .interest
            .execute(poll.poll_id, &user("a"), false)
            .await
            .unwrap();
        assert_eq!(
            first,
            InterestOutcome::Counted {
                count: 1,
                threshold: 2
            }
        );

        let second = h
            .interest
            .execute(poll.poll_id, &user("b"), false)
            .await
            .unwrap();
        assert_eq!(second, InterestOutcome::SessionStarted { url: session_url() });
        assert_eq!(h.slot.status().await, Some(SessionStatus::Active));

        // Another poll is refused while the session runs
        assert!(matches!(
            h.start.execute(&user("host")).await,
            Err(LifecycleError::SessionBusy(SessionStatus::Active))
        ));
    }

    #[tokio::test]
    async fn bots_and_repeat_votes_do_not_count() {
        let mut adapter = MockTableAdapter::new();
        adapter.expect_create_session().never();
        let h = harness(2, Arc::new(adapter), MockSessionRepo::new());
        let poll = h.start.execute(&user("host")).await.unwrap();

        let bot = h
            .interest
            .execute(poll.poll_id, &user("bot"), true)
            .await
            .unwrap();
        assert_eq!(bot, InterestOutcome::Ignored);

        h.interest
            .execute(poll.poll_id, &user("a"), false)
            .await
            .unwrap();
        let again = h
            .interest
            .execute(poll.poll_id, &user("a"), false)
            .await
            .unwrap();
        assert_eq!(
            again,
            InterestOutcome::AlreadyCounted {
                count: 1,
                threshold: 2
            }
        );
        assert_eq!(h.slot.status().await, Some(SessionStatus::Polling));
    }

    #[tokio::test]
    async fn stale_poll_is_ignored() {
        let h = harness(1, Arc::new(MockTableAdapter::new()), MockSessionRepo::new());
        h.start.execute(&user("host")).await.unwrap();

        let outcome = h
            .interest
            .execute(PollId::new(), &user("a"), false)
            .await
            .unwrap();
        assert_eq!(outcome, InterestOutcome::Ignored);
    }

    #[tokio::test]
    async fn withdrawn_vote_delays_threshold() {
        let mut adapter = MockTableAdapter::new();
        adapter.expect_create_session().never();
        let h = harness(2, Arc::new(adapter), MockSessionRepo::new());
        let poll = h.start.execute(&user("host")).await.unwrap();

        h.interest
            .execute(poll.poll_id, &user("a"), false)
            .await
            .unwrap();
        assert_eq!(h.interest.withdraw(poll.poll_id, &user("a")).await, Some(0));

        let outcome = h
            .interest
            .execute(poll.poll_id, &user("b"), false)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            InterestOutcome::Counted {
                count: 1,
                threshold: 2
            }
        );
    }

    async fn drop_vote_mid_create(h: &Harness, adapter: &GatedCreate) {
        let poll = h.start.execute(&user("host")).await.unwrap();
        let dropped = tokio::time::timeout(
            Duration::from_millis(50),
            h.interest.execute(poll.poll_id, &user("a"), false),
        )
        .await;
        assert!(dropped.is_err());
        assert_eq!(h.slot.status().await, Some(SessionStatus::Creating));

        adapter.release.notify_one();
        while h.slot.status().await == Some(SessionStatus::Creating) {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn abandoned_vote_still_releases_slot_when_creation_fails() {
        let adapter = GatedCreate::new(|| Err(AdapterError::automation("login expired")));
        let mut sessions = MockSessionRepo::new();
        sessions.expect_create_game_record().never();
        let h = harness(1, adapter.clone(), sessions);

        drop_vote_mid_create(&h, &adapter).await;

        assert_eq!(h.slot.status().await, None);
        assert!(h.start.execute(&user("host")).await.is_ok());
    }

    #[tokio::test]
    async fn abandoned_vote_still_publishes_created_session() {
        let adapter = GatedCreate::new(|| {
            Ok(CreatedSession {
                handle: SessionHandle::new("h1"),
                url: session_url(),
            })
        });
        let h = harness(1, adapter.clone(), recording_sessions());

        drop_vote_mid_create(&h, &adapter).await;

        assert_eq!(h.slot.status().await, Some(SessionStatus::Active));
        assert!(h.slot.is_current(&session_url()).await);
    }
}
