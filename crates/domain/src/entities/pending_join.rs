use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Money, SessionUrl};

/// A declared intent to join a session with `amount`, awaiting confirmation.
///
/// Transient: lives only in memory and is consumed by the confirm phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingJoinRequest {
    pub amount: Money,
    /// Session that was active when the request was made
    pub session_url: SessionUrl,
    pub created_at: DateTime<Utc>,
}

impl PendingJoinRequest {
    pub fn new(amount: Money, session_url: SessionUrl, created_at: DateTime<Utc>) -> Self {
        Self {
            amount,
            session_url,
            created_at,
        }
    }
}
