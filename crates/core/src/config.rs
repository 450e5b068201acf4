use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Overrides `ocr.tessdata` when set.
pub const TESSDATA_ENV: &str = "SPENDLOG_TESSDATA";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extract: ExtractConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Keyword that precedes the grand total on a receipt.
    pub keyword: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { keyword: "TOTAL".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory holding Tesseract `*.traineddata` files. `None` uses the
    /// engine's built-in search path.
    pub tessdata: Option<PathBuf>,
    pub lang: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self { tessdata: None, lang: "eng".to_string() }
    }
}

impl Config {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of file values.
    pub fn with_env(self) -> Self {
        self.with_tessdata_override(std::env::var_os(TESSDATA_ENV).map(PathBuf::from))
    }

    fn with_tessdata_override(mut self, tessdata: Option<PathBuf>) -> Self {
        if let Some(dir) = tessdata.filter(|d| !d.as_os_str().is_empty()) {
            self.ocr.tessdata = Some(dir);
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.extract.keyword.trim().is_empty() {
            return Err(ConfigError::Invalid("extract.keyword must not be empty".into()));
        }
        if self.ocr.lang.trim().is_empty() {
            return Err(ConfigError::Invalid("ocr.lang must not be empty".into()));
        }
        Ok(())
    }
}
