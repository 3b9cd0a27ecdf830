//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate ports and stores to fulfill member and host commands.

pub mod join;
pub mod leave;
pub mod lifecycle;
pub mod profile;

// Re-export main types
pub use join::JoinUseCases;
pub use leave::LeaveSession;
pub use lifecycle::LifecycleUseCases;
pub use profile::ProfileUseCases;
