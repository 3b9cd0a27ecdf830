//! HTTP error mapping.
//!
//! Preconditions come back with the use case's own message so the caller can
//! show it as-is. Store failures are logged here and reported generically.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::infrastructure::ports::PaymentError;
use crate::use_cases::{
    join::JoinError, leave::LeaveError, lifecycle::LifecycleError, profile::ProfileError,
};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Forbidden(String),
    Conflict(String),
    /// A dependency (table automation, payment config) is not usable right now
    Unavailable(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    fn internal(error: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %error, context = context, "Internal error occurred");
        Self::Internal(format!("An error occurred while {}", context))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.as_str()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.as_str()),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.as_str()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.as_str()),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<LifecycleError> for ApiError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::NotOperator(_) => Self::Forbidden(e.to_string()),
            LifecycleError::SessionBusy(_) | LifecycleError::NoActiveSession => {
                Self::Conflict(e.to_string())
            }
            LifecycleError::CreationFailed(_) => Self::Unavailable(e.to_string()),
            LifecycleError::Validation(_) => Self::BadRequest(e.to_string()),
            LifecycleError::Repo(repo) => Self::internal(repo, "updating the session"),
        }
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        match e {
            JoinError::InvalidAmount => Self::BadRequest(e.to_string()),
            JoinError::Payment(PaymentError::NotConfigured) => Self::Unavailable(e.to_string()),
            JoinError::Payment(PaymentError::Repo(repo)) | JoinError::Repo(repo) => {
                Self::internal(repo, "processing your join")
            }
            JoinError::NoActiveSession
            | JoinError::SessionEnded
            | JoinError::NoProfile
            | JoinError::ProfileIncomplete(_)
            | JoinError::AlreadyPending(_)
            | JoinError::ConfirmInProgress
            | JoinError::NoPendingRequest
            | JoinError::AlreadyPlaying
            | JoinError::NotPlaying => Self::Conflict(e.to_string()),
        }
    }
}

impl From<LeaveError> for ApiError {
    fn from(e: LeaveError) -> Self {
        match e {
            LeaveError::NoActiveSession | LeaveError::NotPlaying => Self::Conflict(e.to_string()),
            LeaveError::Adapter(_) => Self::Unavailable(e.to_string()),
            LeaveError::Repo(repo) => Self::internal(repo, "recording your buyout"),
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::NotFound => Self::NotFound(e.to_string()),
            ProfileError::Validation(_) => Self::BadRequest(e.to_string()),
            ProfileError::Repo(repo) => Self::internal(repo, "updating your profile"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::RepoError;
    use tablehost_domain::SessionStatus;

    fn status_of(error: impl Into<ApiError>) -> StatusCode {
        error.into().into_response().status()
    }

    #[test]
    fn preconditions_map_to_client_errors() {
        assert_eq!(
            status_of(LifecycleError::NotOperator("end the session")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(LifecycleError::SessionBusy(SessionStatus::Polling)),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(JoinError::NoPendingRequest), StatusCode::CONFLICT);
        assert_eq!(status_of(JoinError::InvalidAmount), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(LeaveError::NotPlaying), StatusCode::CONFLICT);
        assert_eq!(status_of(ProfileError::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_and_config_failures_map_to_server_errors() {
        assert_eq!(
            status_of(JoinError::Repo(RepoError::database("add_membership", "locked"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(JoinError::Payment(PaymentError::NotConfigured)),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        let error: ApiError = LeaveError::Repo(RepoError::database("remove", "disk I/O")).into();
        assert!(matches!(&error, ApiError::Internal(msg) if !msg.contains("disk")));
    }
}
