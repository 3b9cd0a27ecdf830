//! Error types for port operations.

use std::time::Duration;

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Stored data no longer satisfies domain validation.
    #[error("Corrupt row in {table}: {message}")]
    Corrupt {
        table: &'static str,
        message: String,
    },

    /// Business constraint violated.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn corrupt(table: &'static str, message: impl ToString) -> Self {
        Self::Corrupt {
            table,
            message: message.to_string(),
        }
    }

    /// Create a ConstraintViolation error.
    pub fn constraint(message: impl ToString) -> Self {
        Self::ConstraintViolation(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failures reported by the table automation.
///
/// All of these are safe to retry from the caller; the engine never retries
/// on its own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// A step did not finish within its budget.
    #[error("{step} timed out after {after:?}")]
    Timeout { step: &'static str, after: Duration },

    /// A page element or flow the automation expected was missing.
    #[error("Not found on the table: {0}")]
    NotFound(String),

    /// The automation itself failed (crash, navigation error, lost login).
    #[error("Table automation failed: {0}")]
    Automation(String),

    /// The automation answered with something we could not interpret.
    #[error("Invalid response from table automation: {0}")]
    InvalidResponse(String),
}

impl AdapterError {
    pub fn automation(message: impl ToString) -> Self {
        Self::Automation(message.to_string())
    }
}

/// Errors resolving how a player should pay.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The host has no receiving handle configured, so no instruction can be given.
    #[error("No host payment handles are configured")]
    NotConfigured,

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
