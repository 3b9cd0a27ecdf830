//! Leave use case.
//!
//! Removes a seated member from the table and records the buyout read from
//! their final stack.

use serde::Serialize;
use std::sync::Arc;

use tablehost_domain::{Money, SessionUrl, UserId};

use crate::infrastructure::ports::{AdapterError, ClockPort, RepoError, SessionRepo, TableAdapter};
use crate::stores::SessionSlot;

/// Errors that can occur while leaving.
#[derive(Debug, thiserror::Error)]
pub enum LeaveError {
    #[error("There is no active session")]
    NoActiveSession,
    #[error("You are not playing in the current session")]
    NotPlaying,
    #[error("Could not remove you from the table ({0}); your seat is unchanged, try again")]
    Adapter(#[from] AdapterError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Reply to a successful leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeftSession {
    pub session_url: SessionUrl,
    pub buyout: Money,
}

/// Remove the caller from the active session.
///
/// The membership check and the removal run under the session gate. When
/// the adapter fails the membership stays as it was; once the table has
/// removed the member, the buyout is recorded even if the caller goes away.
#[derive(Clone)]
pub struct LeaveSession {
    slot: Arc<SessionSlot>,
    sessions: Arc<dyn SessionRepo>,
    adapter: Arc<dyn TableAdapter>,
    clock: Arc<dyn ClockPort>,
}

impl LeaveSession {
    pub fn new(
        slot: Arc<SessionSlot>,
        sessions: Arc<dyn SessionRepo>,
        adapter: Arc<dyn TableAdapter>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            slot,
            sessions,
            adapter,
            clock,
        }
    }

    pub async fn execute(&self, user_id: &UserId) -> Result<LeftSession, LeaveError> {
        let this = self.clone();
        let owned_id = user_id.clone();
        match tokio::spawn(async move { this.leave(&owned_id).await }).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Leave task failed");
                Err(LeaveError::Adapter(AdapterError::automation(e)))
            }
        }
    }

    async fn leave(&self, user_id: &UserId) -> Result<LeftSession, LeaveError> {
        let active = self.slot.active().await.ok_or(LeaveError::NoActiveSession)?;
        let url = active.url().clone();

        let _gate = active.lock_adapter().await;
        if !self.slot.is_current(&url).await {
            return Err(LeaveError::NoActiveSession);
        }

        let membership = self
            .sessions
            .find_active_membership(&url, user_id)
            .await?
            .ok_or(LeaveError::NotPlaying)?;

        let buyout = self
            .adapter
            .remove_player(active.handle(), &membership.table_name)
            .await
            .inspect_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Table adapter failed to remove player")
            })?;

        let updated = self
            .sessions
            .remove_membership(user_id, &url, buyout, self.clock.now())
            .await?;
        if !updated {
            tracing::warn!(user_id = %user_id, session_url = %url, "Membership vanished during leave");
            return Err(LeaveError::NotPlaying);
        }

        tracing::info!(user_id = %user_id, %buyout, session_url = %url, "Player left");
        Ok(LeftSession {
            session_url: url,
            buyout,
        })
    }
}
