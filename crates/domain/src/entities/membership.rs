//! PlayerMembership entity - a user's seat in one session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::UserId;
use crate::value_objects::{Money, SessionUrl, TableName};

/// A seat held by a user in a session.
///
/// Created when the platform admits the player with the agreed stack. Flips
/// to `playing = false` once, when the player is removed and the buyout read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMembership {
    pub user_id: UserId,
    pub session_url: SessionUrl,
    pub table_name: TableName,
    /// Stack the player agreed to buy in for
    pub amount: Money,
    pub joined_at: DateTime<Utc>,
    pub playing: bool,
    pub buyout: Option<Money>,
    pub left_at: Option<DateTime<Utc>>,
}

impl PlayerMembership {
    pub fn new(
        user_id: UserId,
        session_url: SessionUrl,
        table_name: TableName,
        amount: Money,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            session_url,
            table_name,
            amount,
            joined_at,
            playing: true,
            buyout: None,
            left_at: None,
        }
    }

    /// Record that the player left with `buyout`.
    pub fn leave(&mut self, buyout: Money, at: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.playing {
            return Err(DomainError::invalid_state_transition(format!(
                "{} already left {}",
                self.user_id, self.session_url
            )));
        }
        self.playing = false;
        self.buyout = Some(buyout);
        self.left_at = Some(at);
        Ok(())
    }
}
