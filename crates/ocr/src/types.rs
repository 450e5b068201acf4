use serde::{Deserialize, Serialize};
use spendlog_core::Money;
use thiserror::Error;

/// The absence signal: no segment of the OCR text held a usable total.
///
/// This is an expected business outcome, distinct from a total of zero.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("No total amount found on receipt")]
pub struct TotalNotFound;

/// A total read from OCR text. Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptTotal(f64);

impl ReceiptTotal {
    /// `None` unless `value` is finite and non-negative.
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Rounded to cents. `None` only for totals beyond the decimal range.
    pub fn to_money(self) -> Option<Money> {
        Money::from_f64(self.0)
    }
}

impl std::fmt::Display for ReceiptTotal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
