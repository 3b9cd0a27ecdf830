//! Aggregates - consistency boundaries with their own lifecycle

pub mod game_session;
pub mod interest_poll;

pub use game_session::{GameSession, SessionStatus};
pub use interest_poll::{InterestPoll, PollTally};
