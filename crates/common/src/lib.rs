//! Common types and utilities for the specdocs toolchain
//!
//! This crate contains the shared error type, the document loader/writer,
//! and the default-string configuration used across the filter, convert,
//! docgen, and CLI components.

mod document;

pub use document::{load_document, write_document};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while filtering a specification or rendering
/// documentation artifacts
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for specdocs operations
pub type Result<T> = std::result::Result<T, SpecError>;

/// Fallback strings substituted when a specification is missing required
/// metadata.
///
/// Passed explicitly into the filter and converter so alternative frontends
/// can supply their own values instead of relying on process-wide constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecDefaults {
    /// `info.title` used when the input has none
    pub title: String,

    /// `info.version` used when the input has none
    pub version: String,

    /// Placeholder host for legacy documents without a `host` field
    pub host: String,
}

impl Default for SpecDefaults {
    fn default() -> Self {
        Self {
            title: "API".to_string(),
            version: "1.0.0".to_string(),
            host: "api.example.com".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = SpecDefaults::default();
        assert_eq!(defaults.title, "API");
        assert_eq!(defaults.version, "1.0.0");
        assert_eq!(defaults.host, "api.example.com");
    }
}
