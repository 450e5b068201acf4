use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use crate::extract::TotalExtractor;
use crate::preprocess;
use crate::recognizer::{OcrBackend, OcrError};
use crate::types::ReceiptTotal;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] crate::preprocess::PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// Outcome of scanning one receipt image.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptScan {
    /// Raw OCR text output.
    pub ocr_text: String,
    /// `None` when no total could be read from the text.
    pub total: Option<ReceiptTotal>,
}

/// Orchestrates: decode/normalize → OCR → total extraction.
pub struct ReceiptPipeline<R: OcrBackend> {
    recognizer: R,
    extractor: TotalExtractor,
}

impl<R: OcrBackend> ReceiptPipeline<R> {
    pub fn new(recognizer: R) -> Self {
        Self::with_extractor(recognizer, TotalExtractor::default())
    }

    pub fn with_extractor(recognizer: R, extractor: TotalExtractor) -> Self {
        Self { recognizer, extractor }
    }

    /// Process a file on disk.
    pub async fn process_file(&self, path: &Path) -> Result<ReceiptScan, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "read receipt image");
        self.process_bytes(&bytes)
    }

    /// Process raw image bytes (upload or file read).
    pub fn process_bytes(&self, data: &[u8]) -> Result<ReceiptScan, PipelineError> {
        let image_bytes = preprocess::prepare_for_ocr_from_bytes(data)?;
        let ocr_text = self.recognizer.recognize(&image_bytes)?;
        tracing::debug!(engine = self.recognizer.name(), chars = ocr_text.len(), "OCR complete");

        let total = match self.extractor.extract(&ocr_text) {
            Ok(total) => {
                tracing::info!(%total, "receipt total extracted");
                Some(total)
            }
            Err(not_found) => {
                tracing::info!(keyword = self.extractor.keyword(), "{not_found}");
                None
            }
        };

        Ok(ReceiptScan { ocr_text, total })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
