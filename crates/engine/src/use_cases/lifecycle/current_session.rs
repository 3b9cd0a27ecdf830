//! Current session query.

use std::sync::Arc;

use crate::stores::{SessionSlot, SlotSnapshot};

/// Read-only view of the slot for the upward surface.
pub struct CurrentSession {
    slot: Arc<SessionSlot>,
}

impl CurrentSession {
    pub fn new(slot: Arc<SessionSlot>) -> Self {
        Self { slot }
    }

    pub async fn execute(&self) -> SlotSnapshot {
        self.slot.snapshot().await
    }
}
