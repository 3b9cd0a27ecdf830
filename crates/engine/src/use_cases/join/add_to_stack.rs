//! Add-to-stack use case.

use std::sync::Arc;

use tablehost_domain::UserId;

use crate::infrastructure::ports::{PaymentInstruction, PaymentResolver, SessionRepo};
use crate::stores::SessionSlot;

use super::{positive_amount, JoinError};

/// Payment instructions for a top-up by a seated member.
///
/// Only instructions: the stack on the table is adjusted by the host.
pub struct AddToStack {
    slot: Arc<SessionSlot>,
    sessions: Arc<dyn SessionRepo>,
    payments: Arc<dyn PaymentResolver>,
}

impl AddToStack {
    pub fn new(
        slot: Arc<SessionSlot>,
        sessions: Arc<dyn SessionRepo>,
        payments: Arc<dyn PaymentResolver>,
    ) -> Self {
        Self {
            slot,
            sessions,
            payments,
        }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        amount: f64,
    ) -> Result<PaymentInstruction, JoinError> {
        let amount = positive_amount(amount)?;
        let active = self.slot.active().await.ok_or(JoinError::NoActiveSession)?;

        self.sessions
            .find_active_membership(active.url(), user_id)
            .await?
            .ok_or(JoinError::NotPlaying)?;

        let instruction = self.payments.resolve(user_id, amount, active.url()).await?;
        tracing::info!(user_id = %user_id, %amount, "Add-to-stack instructions issued");
        Ok(instruction)
    }
}
