//! External service port traits (table automation, payment instructions).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use tablehost_domain::{Money, PaymentMethod, SessionUrl, TableName, UserId};

use super::error::{AdapterError, PaymentError};

// =============================================================================
// Table Adapter
// =============================================================================

/// Game settings handed to the platform when a session is provisioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub game_name: String,
    pub small_blind: Money,
    pub big_blind: Money,
}

/// Opaque reference to a provisioned session inside the automation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionHandle(String);

impl SessionHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What `create_session` hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSession {
    pub handle: SessionHandle,
    pub url: SessionUrl,
}

/// Result of looking for a player in the waiting list and approving them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitOutcome {
    /// Approved; the platform now shows this stack for the player
    Approved { actual_stack: Money },
    /// No waiting-list entry matched the table name
    NotFound,
}

/// Capability contract for the UI automation that drives the game platform.
///
/// Every call is slow and needs exclusive use of the one automation handle.
/// Callers serialize access per session; implementations may assume it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableAdapter: Send + Sync {
    async fn create_session(&self, config: &SessionConfig) -> Result<CreatedSession, AdapterError>;

    async fn admit_player(
        &self,
        session: &SessionHandle,
        table_name: &TableName,
        expected_stack: Money,
    ) -> Result<AdmitOutcome, AdapterError>;

    /// Removes the player and returns the buyout read from their displayed
    /// stack. Unreadable stack text yields a zero buyout, not an error.
    async fn remove_player(
        &self,
        session: &SessionHandle,
        table_name: &TableName,
    ) -> Result<Money, AdapterError>;
}

// =============================================================================
// Payment Instructions
// =============================================================================

/// How a player should send money to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInstruction {
    pub method: PaymentMethod,
    /// Host handle the player pays to
    pub handle: String,
    pub message: String,
}

/// Produces payment instructions. A pure query as far as the engine is concerned.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentResolver: Send + Sync {
    async fn resolve(
        &self,
        user_id: &UserId,
        amount: Money,
        session_url: &SessionUrl,
    ) -> Result<PaymentInstruction, PaymentError>;
}
