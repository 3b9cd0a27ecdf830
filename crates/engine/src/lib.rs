//! tablehost engine library.
//!
//! Hosts card-game sessions on an external platform that has no API of its
//! own: polls for interest, provisions the session through the table
//! automation, and reconciles who is seated with what they paid.
//!
//! ## Structure
//!
//! - `stores/` - In-memory state shared across requests (session slot, pending joins)
//! - `use_cases/` - User story orchestration
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// Test fixtures shared by unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
