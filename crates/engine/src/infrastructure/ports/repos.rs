//! Repository port traits for database access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tablehost_domain::{
    GameSession, Money, PlayerMembership, ProfileUpdate, SessionStatus, SessionUrl, UserId,
    UserProfile,
};

use super::error::RepoError;

// =============================================================================
// Session Store
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepo: Send + Sync {
    async fn create_game_record(&self, session: &GameSession) -> Result<(), RepoError>;

    async fn update_game_status(
        &self,
        url: &SessionUrl,
        status: SessionStatus,
        at: DateTime<Utc>,
    ) -> Result<(), RepoError>;

    async fn add_membership(&self, membership: &PlayerMembership) -> Result<(), RepoError>;

    /// Marks the playing membership as left with `buyout`.
    /// Returns `false` when there was no playing membership to update.
    async fn remove_membership(
        &self,
        user_id: &UserId,
        url: &SessionUrl,
        buyout: Money,
        at: DateTime<Utc>,
    ) -> Result<bool, RepoError>;

    async fn find_active_membership(
        &self,
        url: &SessionUrl,
        user_id: &UserId,
    ) -> Result<Option<PlayerMembership>, RepoError>;
}

// =============================================================================
// Profile Store
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepoError>;

    /// Creates the profile if missing and refreshes the display name.
    async fn upsert_profile(&self, user_id: &UserId, display_name: &str) -> Result<(), RepoError>;

    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate)
        -> Result<(), RepoError>;
}
