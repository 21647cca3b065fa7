//! Whitelist configuration loading

use crate::pattern::glob_to_regex;
use serde::{Deserialize, Serialize};
use specdocs_common::{load_document, Result, SpecError};
use std::path::Path;

/// Include/exclude glob patterns controlling which paths survive filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhitelistConfig {
    /// A path must match at least one of these to be retained
    #[serde(default)]
    pub include_paths: Vec<String>,

    /// A path matching any of these is dropped even when included
    #[serde(default)]
    pub exclude_paths: Vec<String>,
}

impl WhitelistConfig {
    /// Load a whitelist from a YAML or JSON file.
    ///
    /// A missing or malformed file is a [`SpecError::Config`]: the whitelist
    /// gates everything downstream, so problems with it abort before any
    /// output is produced.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let document = load_document(path).map_err(|e| match e {
            SpecError::Parse(msg) => SpecError::Config(msg),
            other => other,
        })?;

        let config: Self = serde_json::from_value(document).map_err(|e| {
            SpecError::Config(format!("Invalid whitelist config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Compile-check every pattern so a bad config fails before any
    /// filtering work happens.
    pub fn validate(&self) -> Result<()> {
        for pattern in self.include_paths.iter().chain(&self.exclude_paths) {
            glob_to_regex(pattern)?;
        }
        Ok(())
    }
}
