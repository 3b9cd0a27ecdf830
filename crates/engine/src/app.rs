//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    config::AppConfig,
    ports::{ClockPort, PaymentResolver, ProfileRepo, SessionRepo, TableAdapter},
};
use crate::stores::{PendingJoinStore, SessionSlot};
use crate::use_cases::{
    join::{AddToStack, CancelJoin, ConfirmJoin, RequestJoin},
    lifecycle::{
        CreateSession, CurrentSession, EndSession, Operators, RecordInterest, StartInterestPoll,
    },
    profile::ProfileOps,
    JoinUseCases, LeaveSession, LifecycleUseCases, ProfileUseCases,
};

/// Main application state.
///
/// Owns the one session slot and the pending joins against it.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
    pub slot: Arc<SessionSlot>,
    pub pending: Arc<PendingJoinStore>,
}

/// Container for all use cases.
pub struct UseCases {
    pub lifecycle: LifecycleUseCases,
    pub join: JoinUseCases,
    pub leave: Arc<LeaveSession>,
    pub profile: ProfileUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        config: &AppConfig,
        sessions: Arc<dyn SessionRepo>,
        profiles: Arc<dyn ProfileRepo>,
        adapter: Arc<dyn TableAdapter>,
        payments: Arc<dyn PaymentResolver>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let slot = Arc::new(SessionSlot::new());
        let pending = Arc::new(PendingJoinStore::new());
        let operators = Operators::new(config.operator_ids.iter().cloned());

        let create = Arc::new(CreateSession::new(
            slot.clone(),
            adapter.clone(),
            sessions.clone(),
            config.session.clone(),
            clock.clone(),
        ));
        let lifecycle = LifecycleUseCases::new(
            Arc::new(StartInterestPoll::new(
                slot.clone(),
                operators.clone(),
                config.poll_threshold,
                clock.clone(),
            )),
            Arc::new(RecordInterest::new(
                slot.clone(),
                create,
                config.poll_threshold,
            )),
            Arc::new(EndSession::new(
                slot.clone(),
                pending.clone(),
                sessions.clone(),
                operators,
                clock.clone(),
            )),
            Arc::new(CurrentSession::new(slot.clone())),
        );

        let join = JoinUseCases::new(
            Arc::new(RequestJoin::new(
                slot.clone(),
                pending.clone(),
                profiles.clone(),
                sessions.clone(),
                payments.clone(),
                clock.clone(),
            )),
            Arc::new(ConfirmJoin::new(
                slot.clone(),
                pending.clone(),
                profiles.clone(),
                sessions.clone(),
                adapter.clone(),
                clock.clone(),
            )),
            Arc::new(CancelJoin::new(pending.clone())),
            Arc::new(AddToStack::new(slot.clone(), sessions.clone(), payments)),
        );

        let leave = Arc::new(LeaveSession::new(slot.clone(), sessions, adapter, clock));
        let profile = ProfileUseCases::new(Arc::new(ProfileOps::new(profiles)));

        Self {
            use_cases: UseCases {
                lifecycle,
                join,
                leave,
                profile,
            },
            slot,
            pending,
        }
    }
}
