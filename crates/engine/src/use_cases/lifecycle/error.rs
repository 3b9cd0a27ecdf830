//! Session lifecycle errors.

use tablehost_domain::{DomainError, SessionStatus};

use crate::infrastructure::ports::{AdapterError, RepoError};

/// Errors that can occur while polling, creating or ending a session.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Only the host can {0}")]
    NotOperator(&'static str),
    #[error("A session is already {0}; finish it before starting another")]
    SessionBusy(SessionStatus),
    #[error("There is no active session")]
    NoActiveSession,
    #[error("Could not create the session ({0}); start a new poll to try again")]
    CreationFailed(AdapterError),
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
