//! Join use cases.
//!
//! Two-phase seat negotiation: a request with an amount records intent and
//! returns payment instructions; a confirm (amount `0`) asks the table to
//! admit the member and checks the granted stack against the request.

mod add_to_stack;
mod cancel_join;
mod confirm_join;
mod error;
mod request_join;

use serde::Serialize;
use std::sync::Arc;

use tablehost_domain::{Money, TableName, UserId, UserProfile};

pub use add_to_stack::AddToStack;
pub use cancel_join::CancelJoin;
pub use confirm_join::{ConfirmJoin, ConfirmOutcome};
pub use error::JoinError;
pub use request_join::{JoinRequested, RequestJoin};

/// Container for join use cases.
pub struct JoinUseCases {
    pub request: Arc<RequestJoin>,
    pub confirm: Arc<ConfirmJoin>,
    pub cancel: Arc<CancelJoin>,
    pub add_to_stack: Arc<AddToStack>,
}

/// Reply to the single `join(amount)` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum JoinReply {
    Requested(JoinRequested),
    Confirmed(ConfirmOutcome),
}

impl JoinReply {
    /// Text shown to the member.
    pub fn message(&self) -> String {
        match self {
            Self::Requested(requested) => format!(
                "{} Once it's sent, request a seat on the table and join with amount 0.",
                requested.payment.message
            ),
            Self::Confirmed(outcome) => outcome.message(),
        }
    }
}

impl JoinUseCases {
    pub fn new(
        request: Arc<RequestJoin>,
        confirm: Arc<ConfirmJoin>,
        cancel: Arc<CancelJoin>,
        add_to_stack: Arc<AddToStack>,
    ) -> Self {
        Self {
            request,
            confirm,
            cancel,
            add_to_stack,
        }
    }

    /// `amount == 0` confirms the pending request; anything else requests a seat.
    pub async fn join(&self, user_id: &UserId, amount: f64) -> Result<JoinReply, JoinError> {
        if amount == 0.0 {
            self.confirm.execute(user_id).await.map(JoinReply::Confirmed)
        } else {
            self.request
                .execute(user_id, amount)
                .await
                .map(JoinReply::Requested)
        }
    }
}

fn positive_amount(amount: f64) -> Result<Money, JoinError> {
    match Money::from_dollars(amount) {
        Ok(money) if !money.is_zero() => Ok(money),
        _ => Err(JoinError::InvalidAmount),
    }
}

/// The table name to admit under, if the profile allows joining at all.
fn ready_table_name(profile: Option<UserProfile>) -> Result<TableName, JoinError> {
    let profile = profile.ok_or(JoinError::NoProfile)?;
    profile
        .ready_to_join()
        .cloned()
        .map_err(|e| JoinError::ProfileIncomplete(e.user_message().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        AdapterError, AdmitOutcome, CreatedSession, MockPaymentResolver, MockProfileRepo,
        MockSessionRepo, SessionConfig, SessionHandle, TableAdapter,
    };
    use crate::stores::{PendingJoinStore, SessionSlot};
    use crate::test_fixtures::{active_slot, clock, instruction, ready_profile, user};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Adapter that admits at the expected stack after a pause, tracking overlap.
    #[derive(Default)]
    struct SlowAdapter {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        release: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl TableAdapter for SlowAdapter {
        async fn create_session(
            &self,
            _config: &SessionConfig,
        ) -> Result<CreatedSession, AdapterError> {
            Err(AdapterError::automation("not used"))
        }

        async fn admit_player(
            &self,
            _session: &SessionHandle,
            _table_name: &TableName,
            expected_stack: Money,
        ) -> Result<AdmitOutcome, AdapterError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            match &self.release {
                Some(release) => release.notified().await,
                None => tokio::time::sleep(Duration::from_millis(20)).await,
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(AdmitOutcome::Approved {
                actual_stack: expected_stack,
            })
        }

        async fn remove_player(
            &self,
            _session: &SessionHandle,
            _table_name: &TableName,
        ) -> Result<Money, AdapterError> {
            Ok(Money::ZERO)
        }
    }

    fn join_use_cases(slot: Arc<SessionSlot>, adapter: Arc<SlowAdapter>) -> JoinUseCases {
        let pending = Arc::new(PendingJoinStore::new());

        let mut profiles = MockProfileRepo::new();
        profiles
            .expect_get_profile()
            .returning(|id| Ok(Some(ready_profile(id.as_str(), id.as_str()))));
        let profiles = Arc::new(profiles);

        let mut sessions = MockSessionRepo::new();
        sessions
            .expect_find_active_membership()
            .returning(|_, _| Ok(None));
        sessions.expect_add_membership().returning(|_| Ok(()));
        let sessions = Arc::new(sessions);

        let mut payments = MockPaymentResolver::new();
        payments
            .expect_resolve()
            .returning(|_, amount, _| Ok(instruction(amount)));
        let payments = Arc::new(payments);

        JoinUseCases::new(
            Arc::new(RequestJoin::new(
                Arc::clone(&slot),
                Arc::clone(&pending),
                profiles.clone(),
                sessions.clone(),
                payments.clone(),
                clock(),
            )),
            Arc::new(ConfirmJoin::new(
                Arc::clone(&slot),
                Arc::clone(&pending),
                profiles,
                sessions.clone(),
                adapter,
                clock(),
            )),
            Arc::new(CancelJoin::new(pending)),
            Arc::new(AddToStack::new(slot, sessions, payments)),
        )
    }

    #[tokio::test]
    async fn zero_amount_confirms_and_positive_amount_requests() {
        let (slot, _) = active_slot().await;
        let join = join_use_cases(slot, Arc::new(SlowAdapter::default()));

        assert!(matches!(
            join.join(&user("u1"), 0.0).await,
            Err(JoinError::NoPendingRequest)
        ));
        assert!(matches!(
            join.join(&user("u1"), 50.0).await,
            Ok(JoinReply::Requested(_))
        ));
        assert!(matches!(
            join.join(&user("u1"), 0.0).await,
            Ok(JoinReply::Confirmed(ConfirmOutcome::Admitted { .. }))
        ));
    }

    #[tokio::test]
    async fn adapter_calls_on_one_session_never_overlap() {
        let (slot, _) = active_slot().await;
        let adapter = Arc::new(SlowAdapter::default());
        let join = join_use_cases(slot, Arc::clone(&adapter));

        let (a_id, b_id, c_id) = (user("a"), user("b"), user("c"));
        for id in [&a_id, &b_id, &c_id] {
            join.join(id, 10.0).await.unwrap();
        }
        let (a, b, c) = tokio::join!(
            join.join(&a_id, 0.0),
            join.join(&b_id, 0.0),
            join.join(&c_id, 0.0),
        );

        for reply in [a, b, c] {
            assert!(matches!(
                reply,
                Ok(JoinReply::Confirmed(ConfirmOutcome::Admitted { .. }))
            ));
        }
        assert_eq!(adapter.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn confirm_in_flight_blocks_request_cancel_and_confirm() {
        let (slot, _) = active_slot().await;
        let release = Arc::new(Notify::new());
        let adapter = Arc::new(SlowAdapter {
            release: Some(Arc::clone(&release)),
            ..Default::default()
        });
        let join = Arc::new(join_use_cases(slot, Arc::clone(&adapter)));

        join.join(&user("u1"), 50.0).await.unwrap();
        let confirming = {
            let join = Arc::clone(&join);
            tokio::spawn(async move { join.join(&user("u1"), 0.0).await })
        };
        while adapter.in_flight.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            join.join(&user("u1"), 20.0).await,
            Err(JoinError::ConfirmInProgress)
        ));
        assert!(matches!(
            join.join(&user("u1"), 0.0).await,
            Err(JoinError::ConfirmInProgress)
        ));
        assert!(matches!(
            join.cancel.execute(&user("u1")).await,
            Err(JoinError::ConfirmInProgress)
        ));

        release.notify_one();
        let reply = confirming.await.unwrap();
        assert!(matches!(
            reply,
            Ok(JoinReply::Confirmed(ConfirmOutcome::Admitted { .. }))
        ));

        // Single attempt: the next confirm needs a fresh request
        assert!(matches!(
            join.join(&user("u1"), 0.0).await,
            Err(JoinError::NoPendingRequest)
        ));
    }
}
