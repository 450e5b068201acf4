use anyhow::{Context, Result};
use serde::Serialize;
use spendlog_core::Config;
use spendlog_ocr::{
    backend_from_config, ExpenseIntake, ExpenseSubmission, OcrBackend, ReceiptPipeline,
    ReceiptTotal, ResolvedExpense, TotalExtractor,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct ScanLine {
    pub path: PathBuf,
    pub total: Option<ReceiptTotal>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExpenseOutcome {
    Accepted(ResolvedExpense),
    Rejected { reason: String },
}

#[derive(Debug)]
pub enum Output {
    Scans(Vec<ScanLine>),
    Expense(ExpenseOutcome),
}

impl Output {
    pub fn render(&self, json: bool) -> Result<String> {
        if json {
            let text = match self {
                Output::Scans(lines) => serde_json::to_string_pretty(lines)?,
                Output::Expense(outcome) => serde_json::to_string_pretty(outcome)?,
            };
            return Ok(text);
        }

        Ok(match self {
            Output::Scans(lines) => lines
                .iter()
                .map(|l| {
                    let result = match (&l.total, &l.error) {
                        (_, Some(err)) => format!("error: {err}"),
                        (Some(total), None) => total.to_string(),
                        (None, None) => "not found".to_string(),
                    };
                    format!("{}\t{result}", l.path.display())
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Output::Expense(ExpenseOutcome::Accepted(e)) => format!(
                "{} ({:?}) at {}",
                e.amount,
                e.source,
                e.submitted_at.to_rfc3339()
            ),
            Output::Expense(ExpenseOutcome::Rejected { reason }) => format!("rejected: {reason}"),
        })
    }
}

fn pipeline(config: &Config) -> ReceiptPipeline<Box<dyn OcrBackend>> {
    ReceiptPipeline::with_extractor(
        backend_from_config(&config.ocr),
        TotalExtractor::with_keyword(&config.extract.keyword),
    )
}

pub async fn scan(config: &Config, images: &[PathBuf]) -> Result<Output> {
    Ok(Output::Scans(scan_with(&pipeline(config), images).await))
}

/// Failures are reported per image so one bad file does not stop the batch.
async fn scan_with<R: OcrBackend>(pipeline: &ReceiptPipeline<R>, images: &[PathBuf]) -> Vec<ScanLine> {
    let mut lines = Vec::with_capacity(images.len());
    for path in images {
        let line = match pipeline.process_file(path).await {
            Ok(scan) => ScanLine { path: path.clone(), total: scan.total, error: None },
            Err(e) => {
                tracing::warn!("Receipt pipeline error for {}: {e}", path.display());
                ScanLine { path: path.clone(), total: None, error: Some(e.to_string()) }
            }
        };
        lines.push(line);
    }
    lines
}

pub async fn expense(
    config: &Config,
    amount: Option<String>,
    receipt: Option<&Path>,
) -> Result<Output> {
    expense_with(ExpenseIntake::new(pipeline(config)), amount, receipt).await
}

async fn expense_with<R: OcrBackend>(
    intake: ExpenseIntake<R>,
    amount: Option<String>,
    receipt: Option<&Path>,
) -> Result<Output> {
    let receipt = match receipt {
        Some(path) => Some(
            tokio::fs::read(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?,
        ),
        None => None,
    };

    let outcome = match intake.resolve(&ExpenseSubmission { amount, receipt }) {
        Ok(expense) => ExpenseOutcome::Accepted(expense),
        Err(e) if e.is_client_error() => ExpenseOutcome::Rejected { reason: e.to_string() },
        Err(e) => return Err(e).context("resolving expense"),
    };
    Ok(Output::Expense(outcome))
}
