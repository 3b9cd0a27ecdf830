//! Confirm join use case (second phase).

use serde::Serialize;
use std::sync::Arc;

use tablehost_domain::{Money, PendingJoinRequest, PlayerMembership, TableName, UserId};

use crate::infrastructure::ports::{
    AdmitOutcome, ClockPort, ProfileRepo, SessionRepo, TableAdapter,
};
use crate::stores::{PendingJoinStore, SessionSlot};

use super::{ready_table_name, JoinError};

/// How a confirm attempt ended.
///
/// Each of these consumes the pending request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConfirmOutcome {
    /// Seated; the membership records `expected`
    Admitted { expected: Money, actual: Money },
    /// Approved on the table, but with a stack outside tolerance
    StackMismatch { expected: Money, actual: Money },
    /// Nobody in the waiting list matched the member's table name
    NotInWaitlist { table_name: TableName },
    /// Seated on the table, but the membership could not be saved
    SeatedNotRecorded { table_name: TableName, actual: Money },
    /// The automation failed; no membership was written
    AdapterFailed { reason: String },
}

impl ConfirmOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }

    /// Text shown to the member.
    pub fn message(&self) -> String {
        match self {
            Self::Admitted { actual, .. } => {
                format!("You're in! The table shows your stack as ${}.", actual)
            }
            Self::StackMismatch { expected, actual } => format!(
                "Stack mismatch: you asked for ${} but the table shows ${}. \
                 Let the host know so they can fix it.",
                expected, actual
            ),
            Self::NotInWaitlist { table_name } => format!(
                "Couldn't find \"{}\" in the waiting list. Request a seat on the table \
                 under that name, then ask to join again.",
                table_name
            ),
            Self::SeatedNotRecorded { table_name, actual } => format!(
                "The table seated \"{}\" with ${}, but your seat couldn't be saved here. \
                 Ask the host to record it before you leave.",
                table_name, actual
            ),
            Self::AdapterFailed { .. } => {
                "Something went wrong seating you at the table. Please ask to join again."
                    .to_string()
            }
        }
    }
}

/// Admit the member whose request is pending.
///
/// Single attempt: once the table has been asked, the pending request is gone
/// whatever it answered, and a retry starts from a fresh request. A confirm
/// that stops before the table is asked leaves the request waiting. Adapter
/// calls run under the session gate.
#[derive(Clone)]
pub struct ConfirmJoin {
    slot: Arc<SessionSlot>,
    pending: Arc<PendingJoinStore>,
    profiles: Arc<dyn ProfileRepo>,
    sessions: Arc<dyn SessionRepo>,
    adapter: Arc<dyn TableAdapter>,
    clock: Arc<dyn ClockPort>,
}

impl ConfirmJoin {
    pub fn new(
        slot: Arc<SessionSlot>,
        pending: Arc<PendingJoinStore>,
        profiles: Arc<dyn ProfileRepo>,
        sessions: Arc<dyn SessionRepo>,
        adapter: Arc<dyn TableAdapter>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            slot,
            pending,
            profiles,
            sessions,
            adapter,
            clock,
        }
    }

    pub async fn execute(&self, user_id: &UserId) -> Result<ConfirmOutcome, JoinError> {
        let request = self.pending.claim(user_id).await?;

        // The task settles the claim even if this caller goes away.
        let task = {
            let this = self.clone();
            let user_id = user_id.clone();
            tokio::spawn(async move { this.settle(&user_id, request).await })
        };
        let result = match task.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Join confirm task failed");
                self.pending.finish(user_id).await;
                Ok(ConfirmOutcome::AdapterFailed {
                    reason: e.to_string(),
                })
            }
        };

        match &result {
            Ok(outcome) => {
                tracing::info!(user_id = %user_id, outcome = ?outcome, "Join confirm finished")
            }
            Err(e) => tracing::warn!(user_id = %user_id, error = %e, "Join confirm failed"),
        }
        result
    }

    async fn settle(
        &self,
        user_id: &UserId,
        request: PendingJoinRequest,
    ) -> Result<ConfirmOutcome, JoinError> {
        let profile = self.profiles.get_profile(user_id).await;
        let table_name = match profile.map_err(JoinError::from).and_then(ready_table_name) {
            Ok(table_name) => table_name,
            Err(e) => {
                self.pending.release(user_id).await;
                return Err(e);
            }
        };

        let result = self.admit(user_id, &request, table_name).await;
        self.pending.finish(user_id).await;
        result
    }

    async fn admit(
        &self,
        user_id: &UserId,
        request: &PendingJoinRequest,
        table_name: TableName,
    ) -> Result<ConfirmOutcome, JoinError> {
        let active = self
            .slot
            .active()
            .await
            .filter(|active| active.url() == &request.session_url)
            .ok_or(JoinError::SessionEnded)?;

        let _gate = active.lock_adapter().await;
        if !self.slot.is_current(active.url()).await {
            return Err(JoinError::SessionEnded);
        }

        let expected = request.amount;
        let admitted = self
            .adapter
            .admit_player(active.handle(), &table_name, expected)
            .await;

        match admitted {
            Ok(AdmitOutcome::Approved { actual_stack }) if expected.matches_stack(actual_stack) => {
                let membership = PlayerMembership::new(
                    user_id.clone(),
                    active.url().clone(),
                    table_name,
                    expected,
                    self.clock.now(),
                );
                if let Err(e) = self.sessions.add_membership(&membership).await {
                    tracing::error!(
                        user_id = %user_id,
                        table_name = %membership.table_name,
                        amount = %expected,
                        error = %e,
                        "Player is seated on the table but the membership was not recorded"
                    );
                    return Ok(ConfirmOutcome::SeatedNotRecorded {
                        table_name: membership.table_name,
                        actual: actual_stack,
                    });
                }
                Ok(ConfirmOutcome::Admitted {
                    expected,
                    actual: actual_stack,
                })
            }
            Ok(AdmitOutcome::Approved { actual_stack }) => Ok(ConfirmOutcome::StackMismatch {
                expected,
                actual: actual_stack,
            }),
            Ok(AdmitOutcome::NotFound) => Ok(ConfirmOutcome::NotInWaitlist { table_name }),
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Table adapter failed to admit player");
                Ok(ConfirmOutcome::AdapterFailed {
                    reason: e.to_string(),
                })
            }
        }
    }
}
