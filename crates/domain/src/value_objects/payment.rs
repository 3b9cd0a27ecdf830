//! Payment methods and normalized payment handles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Number of digits a Zelle phone number must have.
const ZELLE_DIGITS: usize = 10;

/// A supported peer-to-peer payment service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Venmo,
    CashApp,
    Zelle,
}

impl PaymentMethod {
    /// Preference order when more than one method would work.
    pub const ALL: [PaymentMethod; 3] = [Self::Venmo, Self::CashApp, Self::Zelle];
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Venmo => write!(f, "Venmo"),
            Self::CashApp => write!(f, "CashApp"),
            Self::Zelle => write!(f, "Zelle"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "venmo" => Ok(Self::Venmo),
            "cashapp" => Ok(Self::CashApp),
            "zelle" => Ok(Self::Zelle),
            other => Err(DomainError::parse(format!(
                "Unknown payment method: {}",
                other
            ))),
        }
    }
}

/// A handle for one payment method, normalized on construction:
/// Venmo gets a leading `@`, CashApp a leading `$`, Zelle is 10 bare digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentHandle {
    method: PaymentMethod,
    handle: String,
}

impl PaymentHandle {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the handle is blank, or for Zelle
    /// when it does not contain exactly 10 digits.
    pub fn new(method: PaymentMethod, raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation(format!(
                "{} handle cannot be empty",
                method
            )));
        }

        let handle = match method {
            PaymentMethod::Venmo => with_prefix('@', trimmed)?,
            PaymentMethod::CashApp => with_prefix('$', trimmed)?,
            PaymentMethod::Zelle => {
                let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
                if digits.len() != ZELLE_DIGITS {
                    return Err(DomainError::validation(
                        "Zelle must be a 10-digit phone number (e.g. 555-123-4567)",
                    ));
                }
                digits
            }
        };

        Ok(Self { method, handle })
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn as_str(&self) -> &str {
        &self.handle
    }
}

impl fmt::Display for PaymentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.handle)
    }
}

fn with_prefix(prefix: char, raw: &str) -> Result<String, DomainError> {
    let body = raw.trim_start_matches(prefix).trim();
    if body.is_empty() {
        return Err(DomainError::validation("Payment handle cannot be empty"));
    }
    Ok(format!("{}{}", prefix, body))
}
