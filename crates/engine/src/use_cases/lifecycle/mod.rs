//! Session lifecycle use cases.
//!
//! Polling for interest, provisioning the session on the table, and ending
//! it. All transitions go through the one [`SessionSlot`](crate::stores::SessionSlot).

mod create_session;
mod current_session;
mod end_session;
mod error;
mod record_interest;
mod start_poll;

use std::collections::HashSet;
use std::sync::Arc;

use tablehost_domain::UserId;

pub use create_session::CreateSession;
pub use current_session::CurrentSession;
pub use end_session::EndSession;
pub use error::LifecycleError;
pub use record_interest::{InterestOutcome, RecordInterest};
pub use start_poll::{PollOpened, StartInterestPoll};

/// Container for lifecycle use cases.
pub struct LifecycleUseCases {
    pub start_poll: Arc<StartInterestPoll>,
    pub interest: Arc<RecordInterest>,
    pub end: Arc<EndSession>,
    pub current: Arc<CurrentSession>,
}

impl LifecycleUseCases {
    pub fn new(
        start_poll: Arc<StartInterestPoll>,
        interest: Arc<RecordInterest>,
        end: Arc<EndSession>,
        current: Arc<CurrentSession>,
    ) -> Self {
        Self {
            start_poll,
            interest,
            end,
            current,
        }
    }
}

/// Members allowed to run host-only commands.
#[derive(Debug, Clone, Default)]
pub struct Operators {
    ids: HashSet<UserId>,
}

impl Operators {
    pub fn new(ids: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn is_operator(&self, user_id: &UserId) -> bool {
        self.ids.contains(user_id)
    }

    /// Reject `user_id` unless they are an operator; `action` names the command.
    pub fn require(&self, user_id: &UserId, action: &'static str) -> Result<(), LifecycleError> {
        if self.is_operator(user_id) {
            Ok(())
        } else {
            Err(LifecycleError::NotOperator(action))
        }
    }
}
