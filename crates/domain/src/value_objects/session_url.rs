use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Platform-issued URL of a game session. Primary identity of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionUrl(String);

impl SessionUrl {
    pub fn new(url: impl Into<String>) -> Result<Self, DomainError> {
        let url = url.into();
        let trimmed = url.trim();
        if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
            return Err(DomainError::validation(format!(
                "Session URL must be http(s): {}",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SessionUrl {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<SessionUrl> for String {
    fn from(url: SessionUrl) -> String {
        url.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_and_trims() {
        let url = SessionUrl::new(" https://play.example/game/abc ").unwrap();
        assert_eq!(url.as_str(), "https://play.example/game/abc");
    }

    #[test]
    fn rejects_non_urls() {
        assert!(SessionUrl::new("").is_err());
        assert!(SessionUrl::new("game/abc").is_err());
    }
}
