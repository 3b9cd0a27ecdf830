//! Entities - objects with identity that change over time

mod membership;
mod pending_join;
mod profile;

pub use membership::PlayerMembership;
pub use pending_join::PendingJoinRequest;
pub use profile::{ProfileUpdate, UserProfile};
