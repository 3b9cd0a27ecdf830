//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Persistence (sessions/memberships, profiles)
//! - Table automation (the game platform has no API)
//! - Payment instructions
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{ProfileRepo, SessionRepo};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    AdmitOutcome, CreatedSession, PaymentInstruction, PaymentResolver, SessionConfig,
    SessionHandle, TableAdapter,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{MockPaymentResolver, MockTableAdapter};
#[cfg(test)]
pub use repos::{MockProfileRepo, MockSessionRepo};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{AdapterError, PaymentError, RepoError};
