//! Cancel join use case.

use std::sync::Arc;

use tablehost_domain::{Money, UserId};

use crate::stores::PendingJoinStore;

use super::JoinError;

/// Drop the caller's pending join request.
pub struct CancelJoin {
    pending: Arc<PendingJoinStore>,
}

impl CancelJoin {
    pub fn new(pending: Arc<PendingJoinStore>) -> Self {
        Self { pending }
    }

    /// Returns the amount that was pending.
    pub async fn execute(&self, user_id: &UserId) -> Result<Money, JoinError> {
        let request = self.pending.cancel(user_id).await?;
        tracing::info!(user_id = %user_id, amount = %request.amount, "Join request cancelled");
        Ok(request.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{dollars, fixed_now, session_url, user};
    use tablehost_domain::PendingJoinRequest;

    #[tokio::test]
    async fn cancel_removes_the_request() {
        let pending = Arc::new(PendingJoinStore::new());
        pending
            .insert_new(
                user("u1"),
                PendingJoinRequest::new(dollars(25.0), session_url(), fixed_now()),
            )
            .await
            .unwrap();

        let amount = CancelJoin::new(Arc::clone(&pending))
            .execute(&user("u1"))
            .await
            .unwrap();

        assert_eq!(amount, dollars(25.0));
        assert_eq!(pending.get(&user("u1")).await, None);
    }

    #[tokio::test]
    async fn cancel_without_request_fails() {
        let result = CancelJoin::new(Arc::new(PendingJoinStore::new()))
            .execute(&user("u1"))
            .await;
        assert!(matches!(result, Err(JoinError::NoPendingRequest)));
    }
}
