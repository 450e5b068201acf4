pub mod config;
pub mod money;

pub use config::{Config, ConfigError, ExtractConfig, OcrConfig};
pub use money::{AmountError, Money};
