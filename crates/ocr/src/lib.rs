pub mod extract;
pub mod intake;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod types;

pub use extract::{extract_total, TotalExtractor, DEFAULT_KEYWORD};
pub use intake::{ExpenseIntake, ExpenseSource, ExpenseSubmission, IntakeError, ResolvedExpense};
pub use pipeline::{PipelineError, ReceiptPipeline, ReceiptScan};
pub use preprocess::{prepare_for_ocr, prepare_for_ocr_from_bytes, PreprocessError};
#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;
pub use recognizer::{backend_from_config, MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};
pub use types::{ReceiptTotal, TotalNotFound};
