//! Request join use case (first phase).

use serde::Serialize;
use std::sync::Arc;

use tablehost_domain::{Money, PendingJoinRequest, SessionUrl, UserId};

use crate::infrastructure::ports::{
    ClockPort, PaymentInstruction, PaymentResolver, ProfileRepo, SessionRepo,
};
use crate::stores::{PendingJoinStore, SessionSlot};

use super::{positive_amount, ready_table_name, JoinError};

/// Reply to a join request: how to pay before confirming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinRequested {
    pub amount: Money,
    pub session_url: SessionUrl,
    pub payment: PaymentInstruction,
}

/// Record a member's intent to buy in for `amount`.
///
/// Touches neither the table nor the session store. The member pays, then
/// confirms.
pub struct RequestJoin {
    slot: Arc<SessionSlot>,
    pending: Arc<PendingJoinStore>,
    profiles: Arc<dyn ProfileRepo>,
    sessions: Arc<dyn SessionRepo>,
    payments: Arc<dyn PaymentResolver>,
    clock: Arc<dyn ClockPort>,
}

impl RequestJoin {
    pub fn new(
        slot: Arc<SessionSlot>,
        pending: Arc<PendingJoinStore>,
        profiles: Arc<dyn ProfileRepo>,
        sessions: Arc<dyn SessionRepo>,
        payments: Arc<dyn PaymentResolver>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            slot,
            pending,
            profiles,
            sessions,
            payments,
            clock,
        }
    }

    pub async fn execute(&self, user_id: &UserId, amount: f64) -> Result<JoinRequested, JoinError> {
        let amount = positive_amount(amount)?;
        let active = self.slot.active().await.ok_or(JoinError::NoActiveSession)?;
        let url = active.url().clone();

        ready_table_name(self.profiles.get_profile(user_id).await?)?;

        if self
            .sessions
            .find_active_membership(&url, user_id)
            .await?
            .is_some()
        {
            return Err(JoinError::AlreadyPlaying);
        }

        let request = PendingJoinRequest::new(amount, url.clone(), self.clock.now());
        self.pending
            .insert_new(user_id.clone(), request.clone())
            .await?;

        let payment = match self.payments.resolve(user_id, amount, &url).await {
            Ok(payment) => payment,
            Err(e) => {
                self.pending.remove_unclaimed(user_id, &request).await;
                tracing::warn!(user_id = %user_id, error = %e, "Payment resolution failed, request rolled back");
                return Err(e.into());
            }
        };

        tracing::info!(user_id = %user_id, %amount, session_url = %url, "Join requested");
        Ok(JoinRequested {
            amount,
            session_url: url,
            payment,
        })
    }
}
