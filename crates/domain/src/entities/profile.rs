//! UserProfile entity - per-member payment handles and table name.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::UserId;
use crate::value_objects::{PaymentHandle, PaymentMethod, TableName};

/// A community member's profile.
///
/// # Invariants
///
/// - Each stored handle sits in the slot of its own method (a CashApp handle is
///   never stored as `venmo`).
/// - A join may only proceed when [`UserProfile::ready_to_join`] succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    user_id: UserId,
    display_name: String,
    venmo: Option<PaymentHandle>,
    cashapp: Option<PaymentHandle>,
    zelle: Option<PaymentHandle>,
    table_name: Option<TableName>,
}

impl UserProfile {
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            venmo: None,
            cashapp: None,
            zelle: None,
            table_name: None,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn table_name(&self) -> Option<&TableName> {
        self.table_name.as_ref()
    }

    pub fn payment_handle(&self, method: PaymentMethod) -> Option<&PaymentHandle> {
        match method {
            PaymentMethod::Venmo => self.venmo.as_ref(),
            PaymentMethod::CashApp => self.cashapp.as_ref(),
            PaymentMethod::Zelle => self.zelle.as_ref(),
        }
    }

    /// Handles the member has set, in method preference order.
    pub fn payment_handles(&self) -> impl Iterator<Item = &PaymentHandle> {
        PaymentMethod::ALL
            .into_iter()
            .filter_map(move |method| self.payment_handle(method))
    }

    pub fn has_payment_method(&self) -> bool {
        self.payment_handles().next().is_some()
    }

    /// Check the join preconditions and return the table name to admit under.
    pub fn ready_to_join(&self) -> Result<&TableName, DomainError> {
        if !self.has_payment_method() {
            return Err(DomainError::constraint(
                "Set at least one payment method (Venmo, CashApp or Zelle) before joining",
            ));
        }
        self.table_name
            .as_ref()
            .ok_or_else(|| DomainError::constraint("Set your table name before joining"))
    }

    pub fn set_payment_handle(&mut self, handle: PaymentHandle) {
        let slot = match handle.method() {
            PaymentMethod::Venmo => &mut self.venmo,
            PaymentMethod::CashApp => &mut self.cashapp,
            PaymentMethod::Zelle => &mut self.zelle,
        };
        *slot = Some(handle);
    }

    pub fn set_table_name(&mut self, name: TableName) {
        self.table_name = Some(name);
    }

    pub fn apply(&mut self, update: ProfileUpdate) {
        for handle in [update.venmo, update.cashapp, update.zelle]
            .into_iter()
            .flatten()
        {
            self.set_payment_handle(handle);
        }
        if let Some(name) = update.table_name {
            self.set_table_name(name);
        }
    }
}

/// Partial profile update; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub venmo: Option<PaymentHandle>,
    pub cashapp: Option<PaymentHandle>,
    pub zelle: Option<PaymentHandle>,
    pub table_name: Option<TableName>,
}

impl ProfileUpdate {
    pub fn payment(handle: PaymentHandle) -> Self {
        let mut update = Self::default();
        match handle.method() {
            PaymentMethod::Venmo => update.venmo = Some(handle),
            PaymentMethod::CashApp => update.cashapp = Some(handle),
            PaymentMethod::Zelle => update.zelle = Some(handle),
        }
        update
    }

    pub fn table_name(name: TableName) -> Self {
        Self {
            table_name: Some(name),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile::new(UserId::new("u1").unwrap(), "Alice")
    }

    #[test]
    fn empty_profile_is_not_ready() {
        let err = profile().ready_to_join().unwrap_err();
        assert!(err.user_message().contains("payment method"));
    }

    #[test]
    fn payment_without_table_name_is_not_ready() {
        let mut p = profile();
        p.set_payment_handle(PaymentHandle::new(PaymentMethod::Venmo, "alice").unwrap());
        let err = p.ready_to_join().unwrap_err();
        assert!(err.user_message().contains("table name"));
    }

    #[test]
    fn payment_and_table_name_is_ready() {
        let mut p = profile();
        p.apply(ProfileUpdate::payment(
            PaymentHandle::new(PaymentMethod::Zelle, "555 123 4567").unwrap(),
        ));
        p.apply(ProfileUpdate::table_name(TableName::new("alice").unwrap()));
        assert_eq!(p.ready_to_join().unwrap().as_str(), "alice");
    }

    #[test]
    fn handles_iterate_in_preference_order() {
        let mut p = profile();
        p.set_payment_handle(PaymentHandle::new(PaymentMethod::Zelle, "5551234567").unwrap());
        p.set_payment_handle(PaymentHandle::new(PaymentMethod::Venmo, "alice").unwrap());
        let methods: Vec<_> = p.payment_handles().map(|h| h.method()).collect();
        assert_eq!(methods, vec![PaymentMethod::Venmo, PaymentMethod::Zelle]);
    }
}
