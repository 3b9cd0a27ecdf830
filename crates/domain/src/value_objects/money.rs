//! Dollar amounts for buy-ins, stacks and buyouts.
//!
//! Amounts are held as whole cents so that stack comparisons are exact:
//! `49.99` and `50` differ by exactly one cent, not by a float residue.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Largest gap between requested and granted stack that still counts as a match.
pub const STACK_TOLERANCE: Money = Money { cents: 1 };

/// A non-negative dollar amount, rounded to the cent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Money {
    cents: i64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    /// Build an amount from dollars, rounding to the nearest cent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for NaN, infinities and negative values.
    pub fn from_dollars(dollars: f64) -> Result<Self, DomainError> {
        if !dollars.is_finite() {
            return Err(DomainError::validation("Amount must be a finite number"));
        }
        let cents = (dollars * 100.0).round();
        if cents < 0.0 {
            return Err(DomainError::validation("Amount cannot be negative"));
        }
        if cents > i64::MAX as f64 {
            return Err(DomainError::validation("Amount is too large"));
        }
        Ok(Self {
            cents: cents as i64,
        })
    }

    pub fn from_cents(cents: i64) -> Result<Self, DomainError> {
        if cents < 0 {
            return Err(DomainError::validation("Amount cannot be negative"));
        }
        Ok(Self { cents })
    }

    /// Parse a stack value as the game platform displays it (`"$1,234.50"`, `"49.99"`).
    ///
    /// Returns `None` when the text does not hold a non-negative number.
    pub fn parse_displayed(text: &str) -> Option<Self> {
        let cleaned: String = text
            .trim()
            .chars()
            .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
            .collect();
        if cleaned.is_empty() {
            return None;
        }
        cleaned
            .parse::<f64>()
            .ok()
            .and_then(|value| Self::from_dollars(value).ok())
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    pub fn as_dollars(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Absolute distance between two amounts.
    pub fn distance(&self, other: Money) -> Money {
        Money {
            cents: (self.cents - other.cents).abs(),
        }
    }

    /// Whether the platform-granted stack is close enough to the requested one.
    pub fn matches_stack(&self, granted: Money) -> bool {
        self.distance(granted) <= STACK_TOLERANCE
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl TryFrom<f64> for Money {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_dollars(value)
    }
}

impl From<Money> for f64 {
    fn from(value: Money) -> f64 {
        value.as_dollars()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dollars(value: f64) -> Money {
        Money::from_dollars(value).unwrap()
    }

    #[test]
    fn one_cent_short_still_matches() {
        assert!(dollars(50.0).matches_stack(dollars(49.99)));
        assert!(dollars(50.0).matches_stack(dollars(50.01)));
    }

    #[test]
    fn larger_gap_is_a_mismatch() {
        assert!(!dollars(50.0).matches_stack(dollars(45.0)));
        assert!(!dollars(50.0).matches_stack(dollars(49.98)));
    }

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(dollars(45.0).to_string(), "45.00");
        assert_eq!(dollars(49.99).to_string(), "49.99");
        assert_eq!(dollars(0.5).to_string(), "0.50");
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(Money::from_dollars(-1.0).is_err());
        assert!(Money::from_dollars(f64::NAN).is_err());
        assert!(Money::from_dollars(f64::INFINITY).is_err());
    }

    #[test]
    fn parses_platform_stack_text() {
        assert_eq!(Money::parse_displayed("$1,234.50"), Some(dollars(1234.5)));
        assert_eq!(Money::parse_displayed(" 12.34 "), Some(dollars(12.34)));
        assert_eq!(Money::parse_displayed("0"), Some(Money::ZERO));
    }

    #[test]
    fn garbage_stack_text_does_not_parse() {
        assert_eq!(Money::parse_displayed("Sitting out"), None);
        assert_eq!(Money::parse_displayed(""), None);
        assert_eq!(Money::parse_displayed("-5"), None);
    }

    #[test]
    fn serializes_as_dollars() {
        let json = serde_json::to_string(&dollars(12.34)).unwrap();
        assert_eq!(json, "12.34");
        let back: Money = serde_json::from_str("49.99").unwrap();
        assert_eq!(back.cents(), 4999);
    }
}
