use spendlog_core::OcrConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available — build with `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR backend.
/// Implementations accept PNG image bytes and return the recognized text.
pub trait OcrBackend: Send + Sync {
    /// Short engine identifier used in logs.
    fn name(&self) -> &'static str;

    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError>;
}

impl<T: OcrBackend + ?Sized> OcrBackend for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        (**self).recognize(image_bytes)
    }
}

/// The engine selected by the build: Tesseract when the `tesseract` feature is
/// enabled, otherwise a backend that reports itself unavailable.
pub fn backend_from_config(config: &OcrConfig) -> Box<dyn OcrBackend> {
    #[cfg(feature = "tesseract")]
    {
        Box::new(tesseract_backend::TesseractRecognizer::from_config(config))
    }
    #[cfg(not(feature = "tesseract"))]
    {
        tracing::debug!(lang = %config.lang, "built without tesseract; OCR disabled");
        Box::new(UnavailableRecognizer)
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set string — useful for unit testing the extraction pipeline
/// without requiring Tesseract to be installed.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}

/// Stand-in for builds without an OCR engine. Typed amounts still work.
pub struct UnavailableRecognizer;

impl OcrBackend for UnavailableRecognizer {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Err(OcrError::NotAvailable)
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::LepTess;
    use spendlog_core::OcrConfig;

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }

        pub fn from_config(config: &OcrConfig) -> Self {
            let data_path = config
                .tessdata
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned());
            Self::new(data_path, &config.lang)
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn name(&self) -> &'static str {
            "tesseract"
        }

        fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_preset_text() {
        let r = MockRecognizer::new("STARBUCKS\nTOTAL $5.50\nVISA");
        assert_eq!(r.recognize(b"fake image data").unwrap(), "STARBUCKS\nTOTAL $5.50\nVISA");
    }

    #[test]
    fn mock_ignores_image_content() {
        let r = MockRecognizer::new("hello");
        assert_eq!(r.recognize(b"anything").unwrap(), "hello");
        assert_eq!(r.recognize(b"").unwrap(), "hello");
    }

    #[test]
    fn boxed_backend_delegates() {
        let r: Box<dyn OcrBackend> = Box::new(MockRecognizer::new("boxed"));
        assert_eq!(r.name(), "mock");
        assert_eq!(r.recognize(b"").unwrap(), "boxed");
    }

    #[test]
    fn unavailable_backend_errors() {
        assert!(matches!(
            UnavailableRecognizer.recognize(b"png"),
            Err(OcrError::NotAvailable)
        ));
    }

    #[cfg(feature = "tesseract")]
    #[test]
    fn tesseract_engine_is_exported_at_crate_root() {
        let engine = crate::TesseractRecognizer::from_config(&OcrConfig::default());
        assert_eq!(engine.name(), "tesseract");
        assert_eq!(backend_from_config(&OcrConfig::default()).name(), "tesseract");
    }

    #[cfg(not(feature = "tesseract"))]
    #[test]
    fn default_build_has_no_engine() {
        let backend = backend_from_config(&OcrConfig::default());
        assert_eq!(backend.name(), "unavailable");
    }
}
