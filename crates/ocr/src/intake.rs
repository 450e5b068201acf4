use chrono::{DateTime, Utc};
use serde::Serialize;
use spendlog_core::{AmountError, Money};
use thiserror::Error;

use crate::pipeline::{PipelineError, ReceiptPipeline};
use crate::recognizer::OcrBackend;
use crate::types::TotalNotFound;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Provide an amount or a receipt image")]
    MissingAmount,
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
    #[error(transparent)]
    TotalNotFound(#[from] TotalNotFound),
    #[error("Receipt could not be processed: {0}")]
    Pipeline(#[from] PipelineError),
}

impl IntakeError {
    /// Whether the submitter can fix this by changing their input.
    pub fn is_client_error(&self) -> bool {
        match self {
            IntakeError::Pipeline(PipelineError::Preprocess(_)) => true,
            IntakeError::Pipeline(_) => false,
            _ => true,
        }
    }
}

/// An expense as submitted: a typed amount, a receipt photo, or both.
#[derive(Debug, Clone, Default)]
pub struct ExpenseSubmission {
    pub amount: Option<String>,
    pub receipt: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseSource {
    Typed,
    Receipt,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedExpense {
    pub amount: Money,
    pub source: ExpenseSource,
    pub submitted_at: DateTime<Utc>,
}

/// Turns submissions into amounts. A non-blank typed amount takes precedence
/// over the receipt.
pub struct ExpenseIntake<R: OcrBackend> {
    pipeline: ReceiptPipeline<R>,
}

impl<R: OcrBackend> ExpenseIntake<R> {
    pub fn new(pipeline: ReceiptPipeline<R>) -> Self {
        Self { pipeline }
    }

    pub fn resolve(&self, submission: &ExpenseSubmission) -> Result<ResolvedExpense, IntakeError> {
        self.resolve_at(submission, Utc::now())
    }

    pub fn resolve_at(
        &self,
        submission: &ExpenseSubmission,
        submitted_at: DateTime<Utc>,
    ) -> Result<ResolvedExpense, IntakeError> {
        let typed = submission.amount.as_deref().filter(|a| !a.trim().is_empty());

        let (amount, source) = match (typed, submission.receipt.as_deref()) {
            (Some(typed), _) => (Money::parse(typed)?, ExpenseSource::Typed),
            (None, Some(image)) => {
                let scan = self.pipeline.process_bytes(image)?;
                let amount = scan
                    .total
                    .and_then(|t| t.to_money())
                    .ok_or(TotalNotFound)?;
                (amount, ExpenseSource::Receipt)
            }
            (None, None) => return Err(IntakeError::MissingAmount),
        };

        tracing::info!(%amount, ?source, "expense resolved");
        Ok(ResolvedExpense { amount, source, submitted_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::tiny_png;
    use crate::recognizer::{MockRecognizer, UnavailableRecognizer};
    use chrono::TimeZone;

    fn intake(ocr_text: &str) -> ExpenseIntake<MockRecognizer> {
        ExpenseIntake::new(ReceiptPipeline::new(MockRecognizer::new(ocr_text)))
    }

    fn submission(amount: Option<&str>, receipt: Option<Vec<u8>>) -> ExpenseSubmission {
        ExpenseSubmission { amount: amount.map(str::to_string), receipt }
    }

    #[test]
    fn typed_amount_is_used() {
        let r = intake("").resolve(&submission(Some("12.50"), None)).unwrap();
        assert_eq!(r.amount.to_cents(), Some(1250));
        assert_eq!(r.source, ExpenseSource::Typed);
    }

    #[test]
    fn typed_amount_wins_over_receipt() {
        let r = intake("TOTAL 99.00")
            .resolve(&submission(Some("3.00"), Some(tiny_png())))
            .unwrap();
        assert_eq!(r.amount.to_cents(), Some(300));
        assert_eq!(r.source, ExpenseSource::Typed);
    }

    #[test]
    fn blank_typed_amount_falls_through_to_receipt() {
        let r = intake("SUBTOTAL 10.00\nTAX 1.00\nTOTAL $11.00")
            .resolve(&submission(Some("  "), Some(tiny_png())))
            .unwrap();
        assert_eq!(r.amount.to_cents(), Some(1100));
        assert_eq!(r.source, ExpenseSource::Receipt);
    }

    #[test]
    fn unreadable_receipt_is_total_not_found() {
        let err = intake("THANK YOU").resolve(&submission(None, Some(tiny_png()))).unwrap_err();
        assert!(matches!(err, IntakeError::TotalNotFound(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn nothing_submitted() {
        let err = intake("").resolve(&ExpenseSubmission::default()).unwrap_err();
        assert!(matches!(err, IntakeError::MissingAmount));
        assert!(err.is_client_error());
    }

    #[test]
    fn bad_typed_amount() {
        let err = intake("").resolve(&submission(Some("twelve"), None)).unwrap_err();
        assert!(matches!(err, IntakeError::InvalidAmount(AmountError::Invalid(_))));
    }

    #[test]
    fn engine_failure_is_a_server_error() {
        let intake = ExpenseIntake::new(ReceiptPipeline::new(UnavailableRecognizer));
        let err = intake.resolve(&submission(None, Some(tiny_png()))).unwrap_err();
        assert!(!err.is_client_error());
    }

    #[test]
    fn submission_time_is_recorded() {
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let r = intake("").resolve_at(&submission(Some("1"), None), at).unwrap();
        assert_eq!(r.submitted_at, at);
    }
}
