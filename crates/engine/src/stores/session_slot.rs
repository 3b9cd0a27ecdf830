//! The one process-wide session slot.
//!
//! Every lifecycle transition happens under a single write lock, so two
//! callers can never both win the `Polling -> Creating` race or publish two
//! sessions. The lock is never held across adapter calls; the per-session
//! [`ActiveSession::lock_adapter`] gate is what serializes automation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use tablehost_domain::{
    GameSession, InterestPoll, PollId, PollTally, SessionStatus, SessionUrl, UserId,
};

use crate::infrastructure::ports::SessionHandle;

/// A published session plus the handle and gate used to automate it.
pub struct ActiveSession {
    session: GameSession,
    handle: SessionHandle,
    gate: Mutex<()>,
}

impl ActiveSession {
    pub fn new(session: GameSession, handle: SessionHandle) -> Self {
        Self {
            session,
            handle,
            gate: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn url(&self) -> &SessionUrl {
        self.session.url()
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    /// Exclusive use of the automation for this session. Hold the guard for
    /// the whole adapter call.
    pub async fn lock_adapter(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }
}

impl std::fmt::Debug for ActiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveSession")
            .field("url", self.url())
            .field("handle", &self.handle)
            .finish()
    }
}

#[derive(Debug, Default)]
enum SlotState {
    #[default]
    Idle,
    Polling(InterestPoll),
    Creating,
    Active(Arc<ActiveSession>),
}

/// Read-only view of the slot for status queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotSnapshot {
    Idle,
    Polling {
        poll_id: PollId,
        count: u32,
        threshold: u32,
    },
    Creating,
    Active {
        url: SessionUrl,
        created_at: DateTime<Utc>,
    },
}

/// Why a slot transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlotConflict {
    #[error("a session is already {0}")]
    Occupied(SessionStatus),
    #[error("no session is being created")]
    NotCreating,
}

/// Holder of the current session reference.
#[derive(Default)]
pub struct SessionSlot {
    state: RwLock<SlotState>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of whatever occupies the slot; `None` when idle.
    pub async fn status(&self) -> Option<SessionStatus> {
        occupied_status(&*self.state.read().await)
    }

    pub async fn snapshot(&self) -> SlotSnapshot {
        match &*self.state.read().await {
            SlotState::Idle => SlotSnapshot::Idle,
            SlotState::Polling(poll) => SlotSnapshot::Polling {
                poll_id: poll.id(),
                count: poll.count(),
                threshold: poll.threshold(),
            },
            SlotState::Creating => SlotSnapshot::Creating,
            SlotState::Active(active) => SlotSnapshot::Active {
                url: active.url().clone(),
                created_at: active.session().created_at(),
            },
        }
    }

    /// Current published session, if any.
    pub async fn active(&self) -> Option<Arc<ActiveSession>> {
        match &*self.state.read().await {
            SlotState::Active(active) => Some(Arc::clone(active)),
            _ => None,
        }
    }

    /// Whether `url` is still the published session.
    pub async fn is_current(&self, url: &SessionUrl) -> bool {
        matches!(&*self.state.read().await, SlotState::Active(active) if active.url() == url)
    }

    /// Start collecting interest. Only an idle slot accepts a poll.
    pub async fn open_poll(&self, poll: InterestPoll) -> Result<(), SlotConflict> {
        let mut state = self.state.write().await;
        if let Some(status) = occupied_status(&state) {
            return Err(SlotConflict::Occupied(status));
        }
        *state = SlotState::Polling(poll);
        Ok(())
    }

    /// Count a vote on the open poll.
    ///
    /// Returns `None` when `poll_id` is not the open poll. The vote that
    /// reaches the threshold moves the slot to `Creating`, and only that
    /// caller sees [`PollTally::ThresholdReached`].
    pub async fn record_interest(
        &self,
        poll_id: PollId,
        voter: UserId,
        is_bot: bool,
    ) -> Option<PollTally> {
        let mut state = self.state.write().await;
        let SlotState::Polling(poll) = &mut *state else {
            return None;
        };
        if poll.id() != poll_id {
            return None;
        }
        let tally = poll.record(voter, is_bot);
        if matches!(tally, PollTally::ThresholdReached { .. }) {
            *state = SlotState::Creating;
        }
        Some(tally)
    }

    /// Remove a vote from the open poll. `None` when `poll_id` is not open.
    pub async fn withdraw_interest(&self, poll_id: PollId, voter: &UserId) -> Option<u32> {
        let mut state = self.state.write().await;
        match &mut *state {
            SlotState::Polling(poll) if poll.id() == poll_id => {
                poll.withdraw(voter);
                Some(poll.count())
            }
            _ => None,
        }
    }

    /// Publish the session the adapter just created.
    pub async fn finish_creating(&self, active: Arc<ActiveSession>) -> Result<(), SlotConflict> {
        let mut state = self.state.write().await;
        if !matches!(*state, SlotState::Creating) {
            return Err(SlotConflict::NotCreating);
        }
        *state = SlotState::Active(active);
        Ok(())
    }

    /// Creation failed; release the slot without publishing anything.
    pub async fn abort_creating(&self) {
        let mut state = self.state.write().await;
        if matches!(*state, SlotState::Creating) {
            *state = SlotState::Idle;
        }
    }

    /// Put a session straight into the slot (tests only).
    #[cfg(test)]
    pub async fn set_active(&self, active: Arc<ActiveSession>) {
        *self.state.write().await = SlotState::Active(active);
    }

    /// Clear the reference if `url` is still the published session.
    pub async fn end_active(&self, url: &SessionUrl) -> bool {
        let mut state = self.state.write().await;
        let current = matches!(&*state, SlotState::Active(active) if active.url() == url);
        if current {
            *state = SlotState::Idle;
        }
        current
    }
}

fn occupied_status(state: &SlotState) -> Option<SessionStatus> {
    match state {
        SlotState::Idle => None,
        SlotState::Polling(_) => Some(SessionStatus::Polling),
        SlotState::Creating => Some(SessionStatus::Creating),
        SlotState::Active(_) => Some(SessionStatus::Active),
    }
}
