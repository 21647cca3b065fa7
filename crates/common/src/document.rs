//! Document loading and writing
//!
//! Specifications and whitelist configs are accepted as JSON or YAML,
//! selected by file extension. Output is always 2-space-indented JSON with a
//! trailing newline so downstream tooling sees a stable encoding.

use crate::{Result, SpecError};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load a JSON or YAML document from a file, selected by extension.
///
/// Anything that is not `.yaml`/`.yml` is treated as JSON.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| SpecError::Parse(format!("Failed to read {}: {}", path.display(), e)))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .map_err(|e| SpecError::Parse(format!("Invalid YAML in {}: {}", path.display(), e))),
        _ => serde_json::from_str(&content)
            .map_err(|e| SpecError::Parse(format!("Invalid JSON in {}: {}", path.display(), e))),
    }
}

/// Write a document as pretty-printed JSON with a trailing newline.
pub fn write_document<P: AsRef<Path>>(path: P, document: &Value) -> Result<()> {
    let mut rendered = serde_json::to_string_pretty(document)?;
    rendered.push('\n');
    fs::write(path.as_ref(), rendered)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_json_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spec.json");
        fs::write(&path, r#"{"openapi": "3.0.3", "paths": {}}"#).unwrap();

        let document = load_document(&path).unwrap();
        assert_eq!(document["openapi"], "3.0.3");
    }

    #[test]
    fn test_load_yaml_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("whitelist.yaml");
        fs::write(&path, "include_paths:\n  - /v2/workspaces\n").unwrap();

        let document = load_document(&path).unwrap();
        assert_eq!(document["include_paths"][0], "/v2/workspaces");
    }

    #[test]
    fn test_load_malformed_json_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        match load_document(&path) {
            Err(SpecError::Parse(msg)) => assert!(msg.contains("broken.json")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_write_document_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        let document = json!({"info": {"title": "API"}});
        write_document(&path, &document).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with('\n'));
        assert_eq!(load_document(&path).unwrap(), document);
    }
}
