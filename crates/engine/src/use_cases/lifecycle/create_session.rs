//! Create session use case.
//!
//! Runs once the interest threshold moves the slot to `Creating`.

use std::sync::Arc;

use tablehost_domain::{GameSession, SessionUrl};

use crate::infrastructure::ports::{ClockPort, SessionConfig, SessionRepo, TableAdapter};
use crate::stores::{ActiveSession, SessionSlot};

use super::LifecycleError;

/// Provision the session on the table and publish it.
///
/// Nothing is published unless both the adapter and the game record write
/// succeed; any failure returns the slot to idle and the host has to poll
/// again.
pub struct CreateSession {
    slot: Arc<SessionSlot>,
    adapter: Arc<dyn TableAdapter>,
    sessions: Arc<dyn SessionRepo>,
    config: SessionConfig,
    clock: Arc<dyn ClockPort>,
}

impl CreateSession {
    pub fn new(
        slot: Arc<SessionSlot>,
        adapter: Arc<dyn TableAdapter>,
        sessions: Arc<dyn SessionRepo>,
        config: SessionConfig,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            slot,
            adapter,
            sessions,
            config,
            clock,
        }
    }

    pub async fn execute(&self) -> Result<SessionUrl, LifecycleError> {
        let created = match self.adapter.create_session(&self.config).await {
            Ok(created) => created,
            Err(e) => {
                tracing::error!(error = %e, "Table adapter failed to create session");
                self.slot.abort_creating().await;
                return Err(LifecycleError::CreationFailed(e));
            }
        };

        let session = GameSession::activated(created.url.clone(), self.clock.now());
        if let Err(e) = self.sessions.create_game_record(&session).await {
            tracing::error!(
                error = %e,
                session_url = %created.url,
                "Failed to record created session, leaving it unpublished"
            );
            self.slot.abort_creating().await;
            return Err(e.into());
        }

        let url = created.url.clone();
        self.slot
            .finish_creating(Arc::new(ActiveSession::new(session, created.handle)))
            .await
            .map_err(|_| LifecycleError::NoActiveSession)?;

        tracing::info!(session_url = %url, "Session is active");
        Ok(url)
    }
}
