//! Pending join requests, keyed by member.
//!
//! An entry is *waiting* after the request phase and *confirming* while a
//! confirm is talking to the table. A confirming entry cannot be replaced,
//! cancelled or claimed again; it disappears when the confirm finishes, or
//! goes back to waiting if the confirm stopped before reaching the table.

use std::collections::HashMap;
use tokio::sync::Mutex;

use tablehost_domain::{PendingJoinRequest, SessionUrl, UserId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PendingConflict {
    #[error("a join request is already pending")]
    AlreadyPending(PendingJoinRequest),
    #[error("a confirmation is already in progress")]
    Confirming,
    #[error("no pending join request")]
    NotPending,
}

#[derive(Debug)]
struct Entry {
    request: PendingJoinRequest,
    confirming: bool,
}

/// In-memory store of outstanding join requests.
#[derive(Default)]
pub struct PendingJoinStore {
    entries: Mutex<HashMap<UserId, Entry>>,
}

impl PendingJoinStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new request. An existing entry is left untouched.
    pub async fn insert_new(
        &self,
        user_id: UserId,
        request: PendingJoinRequest,
    ) -> Result<(), PendingConflict> {
        let mut entries = self.entries.lock().await;
        if let Some(existing) = entries.get(&user_id) {
            return Err(if existing.confirming {
                PendingConflict::Confirming
            } else {
                PendingConflict::AlreadyPending(existing.request.clone())
            });
        }
        entries.insert(
            user_id,
            Entry {
                request,
                confirming: false,
            },
        );
        Ok(())
    }

    /// Mark the request as confirming and hand it to the caller.
    pub async fn claim(&self, user_id: &UserId) -> Result<PendingJoinRequest, PendingConflict> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .get_mut(user_id)
            .ok_or(PendingConflict::NotPending)?;
        if entry.confirming {
            return Err(PendingConflict::Confirming);
        }
        entry.confirming = true;
        Ok(entry.request.clone())
    }

    /// Hand a claimed request back to waiting; the confirm never reached the table.
    pub async fn release(&self, user_id: &UserId) {
        if let Some(entry) = self.entries.lock().await.get_mut(user_id) {
            entry.confirming = false;
        }
    }

    /// Drop the entry once its confirm has an outcome.
    pub async fn finish(&self, user_id: &UserId) -> Option<PendingJoinRequest> {
        self.entries
            .lock()
            .await
            .remove(user_id)
            .map(|entry| entry.request)
    }

    /// Member-initiated cancel. Refused while confirming.
    pub async fn cancel(&self, user_id: &UserId) -> Result<PendingJoinRequest, PendingConflict> {
        let mut entries = self.entries.lock().await;
        match entries.get(user_id) {
            None => Err(PendingConflict::NotPending),
            Some(entry) if entry.confirming => Err(PendingConflict::Confirming),
            Some(_) => entries
                .remove(user_id)
                .map(|entry| entry.request)
                .ok_or(PendingConflict::NotPending),
        }
    }

    /// Undo a request phase that could not finish. Only removes `request`
    /// itself, and only while nobody is confirming it.
    pub async fn remove_unclaimed(&self, user_id: &UserId, request: &PendingJoinRequest) -> bool {
        let mut entries = self.entries.lock().await;
        let matches = entries
            .get(user_id)
            .is_some_and(|entry| !entry.confirming && entry.request == *request);
        if matches {
            entries.remove(user_id);
        }
        matches
    }

    /// Discard every request made against `session_url`. Returns how many went.
    pub async fn clear_session(&self, session_url: &SessionUrl) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.request.session_url != *session_url);
        before - entries.len()
    }

    pub async fn get(&self, user_id: &UserId) -> Option<PendingJoinRequest> {
        self.entries
            .lock()
            .await
            .get(user_id)
            .map(|entry| entry.request.clone())
    }

    pub async fn is_confirming(&self, user_id: &UserId) -> bool {
        self.entries
            .lock()
            .await
            .get(user_id)
            .is_some_and(|entry| entry.confirming)
    }
}
