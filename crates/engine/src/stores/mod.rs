//! In-memory state storage modules.
//!
//! Stores manage runtime state that doesn't belong in the database:
//! - `SessionSlot` - the one current session and its adapter gate
//! - `PendingJoinStore` - join requests awaiting confirmation

pub mod pending_join;
pub mod session_slot;

// Re-export store types
pub use pending_join::{PendingConflict, PendingJoinStore};
pub use session_slot::{ActiveSession, SessionSlot, SlotConflict, SlotSnapshot};
