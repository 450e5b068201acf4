use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,
    #[error("Not a valid amount: '{0}'")]
    Invalid(String),
    #[error("Amount must not be negative: '{0}'")]
    Negative(String),
}

/// A currency amount held to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// `None` when the amount does not fit in an `i64` number of cents.
    pub fn to_cents(self) -> Option<i64> {
        (self.0 * Decimal::from(100)).round().to_i64()
    }

    fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    /// Converts an OCR-derived float. `None` for NaN, infinities and values
    /// outside the decimal range.
    pub fn from_f64(value: f64) -> Option<Self> {
        Decimal::from_f64(value).map(Self::from_decimal)
    }

    /// Parses a user-typed amount such as `12.5`, `$1,234.56` or ` 7 `.
    pub fn parse(input: &str) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).replace(',', "");
        let value = Decimal::from_str(digits.trim())
            .map_err(|_| AmountError::Invalid(trimmed.to_string()))?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(trimmed.to_string()));
        }
        Ok(Self::from_decimal(value.abs()))
    }
}

impl FromStr for Money {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_and_formatted_amounts() {
        assert_eq!(Money::parse("12.50").unwrap().to_cents(), Some(1250));
        assert_eq!(Money::parse(" 7 ").unwrap().to_cents(), Some(700));
        assert_eq!(Money::parse("$1,234.56").unwrap().to_cents(), Some(123456));
    }

    #[test]
    fn parse_rounds_to_cents() {
        assert_eq!(Money::parse("0.125").unwrap().to_cents(), Some(12));
        assert_eq!(Money::parse("0.135").unwrap().to_cents(), Some(14));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(Money::parse("   "), Err(AmountError::Empty));
        assert_eq!(Money::parse("abc"), Err(AmountError::Invalid("abc".into())));
        assert_eq!(Money::parse("-3.00"), Err(AmountError::Negative("-3.00".into())));
    }

    #[test]
    fn from_f64_handles_non_finite() {
        assert_eq!(Money::from_f64(11.0).unwrap().to_cents(), Some(1100));
        assert_eq!(Money::from_f64(1234.56).unwrap().to_cents(), Some(123456));
        assert!(Money::from_f64(f64::NAN).is_none());
        assert!(Money::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(Money::parse("5.5").unwrap().to_string(), "$5.50");
        assert_eq!(Money::parse("0").unwrap().to_string(), "$0.00");
    }

    #[test]
    fn from_str_matches_parse() {
        assert_eq!("$7.10".parse::<Money>(), Money::parse("7.10"));
    }

    #[test]
    fn serde_roundtrip_keeps_value() {
        let m = Money::parse("9.99").unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(serde_json::from_str::<Money>(&json).unwrap(), m);
    }
}
