//! Payment instructions built from the host's receiving handles.

use async_trait::async_trait;
use std::sync::Arc;

use tablehost_domain::{Money, PaymentHandle, PaymentMethod, SessionUrl, UserId};

use crate::infrastructure::ports::{
    PaymentError, PaymentInstruction, PaymentResolver, ProfileRepo,
};

/// Resolves instructions against the handles the host accepts.
///
/// Prefers a method the player has set up themselves, in Venmo, CashApp,
/// Zelle order, and otherwise falls back to the host's first handle.
pub struct HostPaymentResolver {
    host_handles: Vec<PaymentHandle>,
    profiles: Arc<dyn ProfileRepo>,
}

impl HostPaymentResolver {
    pub fn new(host_handles: Vec<PaymentHandle>, profiles: Arc<dyn ProfileRepo>) -> Self {
        Self {
            host_handles,
            profiles,
        }
    }

    fn host_handle_for(&self, method: PaymentMethod) -> Option<&PaymentHandle> {
        self.host_handles.iter().find(|h| h.method() == method)
    }
}

#[async_trait]
impl PaymentResolver for HostPaymentResolver {
    async fn resolve(
        &self,
        user_id: &UserId,
        amount: Money,
        session_url: &SessionUrl,
    ) -> Result<PaymentInstruction, PaymentError> {
        let fallback = self.host_handles.first().ok_or(PaymentError::NotConfigured)?;

        let profile = self.profiles.get_profile(user_id).await?;
        let chosen = profile
            .as_ref()
            .and_then(|p| {
                p.payment_handles()
                    .find_map(|own| self.host_handle_for(own.method()))
            })
            .unwrap_or(fallback);

        Ok(PaymentInstruction {
            method: chosen.method(),
            handle: chosen.as_str().to_string(),
            message: format!(
                "Send ${} via {} to {} with the note \"{}\".",
                amount,
                chosen.method(),
                chosen,
                session_url
            ),
        })
    }
}
