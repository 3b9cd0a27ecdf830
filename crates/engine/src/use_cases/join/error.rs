//! Join operation errors.

use tablehost_domain::Money;

use crate::infrastructure::ports::{PaymentError, RepoError};
use crate::stores::PendingConflict;

/// Errors that can occur while requesting, confirming or topping up a seat.
///
/// Every variant except the store failures is a precondition: nothing was
/// changed and the message tells the member what to do next.
#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    #[error("There is no active session to join")]
    NoActiveSession,
    #[error("The session you asked to join has ended")]
    SessionEnded,
    #[error("Set up your profile first: add a payment method and your table name")]
    NoProfile,
    #[error("{0}")]
    ProfileIncomplete(String),
    #[error("Amount must be a positive number of dollars")]
    InvalidAmount,
    #[error("You already asked to join with ${0}; confirm with join 0 or cancel it first")]
    AlreadyPending(Money),
    #[error("Your join is already being confirmed, hang tight")]
    ConfirmInProgress,
    #[error("You have no pending join request; ask to join with an amount first")]
    NoPendingRequest,
    #[error("You are already playing in this session")]
    AlreadyPlaying,
    #[error("You are not playing in the current session")]
    NotPlaying,
    #[error("Payment instructions unavailable: {0}")]
    Payment(#[from] PaymentError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<PendingConflict> for JoinError {
    fn from(conflict: PendingConflict) -> Self {
        match conflict {
            PendingConflict::AlreadyPending(request) => Self::AlreadyPending(request.amount),
            PendingConflict::Confirming => Self::ConfirmInProgress,
            PendingConflict::NotPending => Self::NoPendingRequest,
        }
    }
}
