//! GameSession aggregate - one hosting round on the external platform.
//!
//! # Lifecycle
//!
//! ```text
//! Polling ──threshold──▶ Creating ──CreateSession ok──▶ Active ──end──▶ Ended
//! ```
//!
//! Status only ever moves forward. A session record exists from the moment
//! the platform issues its URL, so persisted sessions start at `Active`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::SessionUrl;

/// Position of a hosting round in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Polling,
    Creating,
    Active,
    Ended,
}

impl SessionStatus {
    /// Whether `next` is the single forward step from `self`.
    pub fn can_advance_to(self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Polling, Self::Creating)
                | (Self::Creating, Self::Active)
                | (Self::Active, Self::Ended)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polling => "polling",
            Self::Creating => "creating",
            Self::Active => "active",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "polling" => Ok(Self::Polling),
            "creating" => Ok(Self::Creating),
            "active" => Ok(Self::Active),
            "ended" => Ok(Self::Ended),
            other => Err(DomainError::parse(format!(
                "Unknown session status: {}",
                other
            ))),
        }
    }
}

/// A hosting round identified by its platform URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    url: SessionUrl,
    status: SessionStatus,
    created_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// A session the platform has just provisioned.
    pub fn activated(url: SessionUrl, now: DateTime<Utc>) -> Self {
        Self {
            url,
            status: SessionStatus::Active,
            created_at: now,
            ended_at: None,
        }
    }

    /// Rebuild from storage.
    pub fn from_parts(
        url: SessionUrl,
        status: SessionStatus,
        created_at: DateTime<Utc>,
        ended_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            url,
            status,
            created_at,
            ended_at,
        }
    }

    pub fn url(&self) -> &SessionUrl {
        &self.url
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn end(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.status.can_advance_to(SessionStatus::Ended) {
            return Err(DomainError::invalid_state_transition(format!(
                "cannot end a session that is {}",
                self.status
            )));
        }
        self.status = SessionStatus::Ended;
        self.ended_at = Some(now);
        Ok(())
    }
}
