//! Profile use cases.
//!
//! Members register how they pay and the name they sit under at the table.
//! Both are required before a join.

use std::sync::Arc;

use tablehost_domain::{
    DomainError, PaymentHandle, PaymentMethod, ProfileUpdate, TableName, UserId, UserProfile,
};

use crate::infrastructure::ports::{ProfileRepo, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("No profile yet; set a payment method or table name first")]
    NotFound,
    #[error("{}", .0.user_message())]
    Validation(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Container for profile use cases.
pub struct ProfileUseCases {
    pub ops: Arc<ProfileOps>,
}

impl ProfileUseCases {
    pub fn new(ops: Arc<ProfileOps>) -> Self {
        Self { ops }
    }
}

/// Profile operations.
pub struct ProfileOps {
    profiles: Arc<dyn ProfileRepo>,
}

impl ProfileOps {
    pub fn new(profiles: Arc<dyn ProfileRepo>) -> Self {
        Self { profiles }
    }

    /// Store a normalized payment handle, creating the profile if needed.
    pub async fn set_payment_method(
        &self,
        user_id: &UserId,
        display_name: &str,
        method: PaymentMethod,
        raw_handle: &str,
    ) -> Result<PaymentHandle, ProfileError> {
        let handle = PaymentHandle::new(method, raw_handle)?;

        self.profiles.upsert_profile(user_id, display_name).await?;
        self.profiles
            .update_profile(user_id, ProfileUpdate::payment(handle.clone()))
            .await?;

        tracing::info!(user_id = %user_id, %method, "Payment method updated");
        Ok(handle)
    }

    pub async fn set_table_name(
        &self,
        user_id: &UserId,
        display_name: &str,
        raw_name: &str,
    ) -> Result<TableName, ProfileError> {
        let name = TableName::new(raw_name)?;

        self.profiles.upsert_profile(user_id, display_name).await?;
        self.profiles
            .update_profile(user_id, ProfileUpdate::table_name(name.clone()))
            .await?;

        tracing::info!(user_id = %user_id, table_name = %name, "Table name updated");
        Ok(name)
    }

    pub async fn get(&self, user_id: &UserId) -> Result<UserProfile, ProfileError> {
        self.profiles
            .get_profile(user_id)
            .await?
            .ok_or(ProfileError::NotFound)
    }
}
