//! Start interest poll use case.

use serde::Serialize;
use std::sync::Arc;

use tablehost_domain::{InterestPoll, PollId, UserId};

use crate::infrastructure::ports::ClockPort;
use crate::stores::{SessionSlot, SlotConflict};

use super::{LifecycleError, Operators};

/// What the members are told when a poll opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollOpened {
    pub poll_id: PollId,
    /// Interested members needed before the session is created
    pub threshold: u32,
}

/// Open a poll gauging interest in a new session.
///
/// Operator-only. Refused while any poll, creation or session occupies the slot.
pub struct StartInterestPoll {
    slot: Arc<SessionSlot>,
    operators: Operators,
    threshold: u32,
    clock: Arc<dyn ClockPort>,
}

impl StartInterestPoll {
    pub fn new(
        slot: Arc<SessionSlot>,
        operators: Operators,
        threshold: u32,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            slot,
            operators,
            threshold,
            clock,
        }
    }

    pub async fn execute(&self, operator: &UserId) -> Result<PollOpened, LifecycleError> {
        self.operators.require(operator, "start a poll")?;

        let poll = InterestPoll::open(self.threshold, operator.clone(), self.clock.now())?;
        let poll_id = poll.id();
        self.slot.open_poll(poll).await.map_err(|conflict| match conflict {
            SlotConflict::Occupied(status) => LifecycleError::SessionBusy(status),
            SlotConflict::NotCreating => LifecycleError::NoActiveSession,
        })?;

        tracing::info!(%poll_id, threshold = self.threshold, operator = %operator, "Interest poll opened");
        Ok(PollOpened {
            poll_id,
            threshold: self.threshold,
        })
    }
}
