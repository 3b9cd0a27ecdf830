//! External table display names and the rule for matching them.
//!
//! The game platform shows players under the name they typed, sometimes with
//! an identifier appended (`"Alice ID:ab12cd34ef"`). Two names refer to the
//! same player when their [`TableName::matching_key`]s are equal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::DomainError;

/// Maximum length accepted for a table display name
const MAX_TABLE_NAME_LENGTH: usize = 64;

static PLATFORM_ID_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ID:[A-Za-z0-9]{10}$").expect("valid regex"));

/// A validated external table display name (non-empty, <=64 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Create a new validated table name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - The name exceeds 64 characters after trimming
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Table name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_TABLE_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Table name cannot exceed {} characters",
                MAX_TABLE_NAME_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical form used for comparisons: trimmed, platform id suffix
    /// removed, lowercased.
    pub fn matching_key(displayed: &str) -> String {
        let trimmed = displayed.trim();
        PLATFORM_ID_SUFFIX
            .replace(trimmed, "")
            .trim()
            .to_lowercase()
    }

    /// Whether a name shown by the platform refers to this player.
    pub fn matches(&self, displayed: &str) -> bool {
        Self::matching_key(&self.0) == Self::matching_key(displayed)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TableName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<TableName> for String {
    fn from(name: TableName) -> String {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> TableName {
        TableName::new(raw).unwrap()
    }

    #[test]
    fn matches_ignoring_case_and_platform_suffix() {
        assert!(name("alice").matches("Alice ID:ab12cd34ef"));
        assert!(name("Alice").matches("  ALICE  "));
    }

    #[test]
    fn suffix_must_be_exactly_ten_alphanumerics() {
        assert!(!name("alice").matches("Alice ID:ab12cd34e"));
        assert!(!name("alice").matches("Alice ID:ab12cd34ef1"));
        assert!(!name("alice").matches("Alice ID:ab12cd34e!"));
    }

    #[test]
    fn suffix_needs_a_leading_space() {
        assert!(!name("alice").matches("AliceID:ab12cd34ef"));
    }

    #[test]
    fn different_names_do_not_match() {
        assert!(!name("alice").matches("Alicia ID:ab12cd34ef"));
        assert!(!name("bob").matches("alice"));
    }

    #[test]
    fn trailing_whitespace_after_suffix_is_tolerated() {
        assert!(name("alice").matches("Alice ID:ab12cd34ef   "));
    }

    #[test]
    fn rejects_empty_and_overlong_names() {
        assert!(TableName::new("   ").is_err());
        assert!(TableName::new("x".repeat(65)).is_err());
        assert!(TableName::new("x".repeat(64)).is_ok());
    }
}
