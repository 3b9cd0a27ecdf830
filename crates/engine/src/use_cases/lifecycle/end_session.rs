//! End session use case.

use std::sync::Arc;

use tablehost_domain::{SessionUrl, UserId};

use crate::infrastructure::ports::{ClockPort, SessionRepo};
use crate::stores::{PendingJoinStore, SessionSlot};

use super::{LifecycleError, Operators};

/// End the active session.
///
/// Waits for any in-flight admission or removal on the session, records the
/// end, then clears the reference and every pending join made against it.
/// No payout processing happens here.
pub struct EndSession {
    slot: Arc<SessionSlot>,
    pending: Arc<PendingJoinStore>,
    sessions: Arc<dyn SessionRepo>,
    operators: Operators,
    clock: Arc<dyn ClockPort>,
}

impl EndSession {
    pub fn new(
        slot: Arc<SessionSlot>,
        pending: Arc<PendingJoinStore>,
        sessions: Arc<dyn SessionRepo>,
        operators: Operators,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            slot,
            pending,
            sessions,
            operators,
            clock,
        }
    }

    pub async fn execute(&self, operator: &UserId) -> Result<SessionUrl, LifecycleError> {
        self.operators.require(operator, "end the session")?;

        let active = self
            .slot
            .active()
            .await
            .ok_or(LifecycleError::NoActiveSession)?;
        let url = active.url().clone();

        let _gate = active.lock_adapter().await;
        if !self.slot.is_current(&url).await {
            return Err(LifecycleError::NoActiveSession);
        }

        let mut ended = active.session().clone();
        let ended_at = self.clock.now();
        ended.end(ended_at)?;
        self.sessions
            .update_game_status(&url, ended.status(), ended_at)
            .await?;
        self.slot.end_active(&url).await;
        let dropped = self.pending.clear_session(&url).await;

        tracing::info!(
            session_url = %url,
            operator = %operator,
            dropped_pending = dropped,
            "Session ended"
        );
        Ok(url)
    }
}
