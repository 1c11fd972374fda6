//! Configuration error types.

use std::path::PathBuf;

use bbcode_core::ConfigurationError;

/// Error loading or building a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// File extension is neither `.xml` nor `.toml`.
    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Encoding error while decoding XML text.
    #[error("XML encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Invalid tag definition or substitution pattern.
    #[error("Invalid configuration: {0}")]
    Definition(#[from] ConfigurationError),
    /// Document structure does not match the expected schema.
    #[error("Configuration error: {0}")]
    Validation(String),
}
