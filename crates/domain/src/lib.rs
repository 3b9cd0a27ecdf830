//! tablehost domain.
//!
//! Core types for hosting card-game sessions on an external platform: the
//! session lifecycle, member profiles, seats and the values they are built
//! from. No I/O happens here.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::{GameSession, InterestPoll, PollTally, SessionStatus};
pub use entities::{PendingJoinRequest, PlayerMembership, ProfileUpdate, UserProfile};
pub use error::DomainError;
pub use ids::{PollId, UserId};
pub use value_objects::{Money, PaymentHandle, PaymentMethod, SessionUrl, TableName, STACK_TOLERANCE};
