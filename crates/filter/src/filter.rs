//! Specification filtering
//!
//! Reduces a specification to the whitelisted paths, the tags those paths
//! use, and the schema definitions transitively reachable from them.

use crate::pattern::matches_any;
use crate::refs::{collect_refs, reference_closure};
use crate::whitelist::WhitelistConfig;
use serde_json::{Map, Value};
use specdocs_common::{Result, SpecDefaults, SpecError};
use std::collections::BTreeSet;

/// Counters and diagnostics from one filtering run.
///
/// This is the observable side channel of [`filter_spec`]: callers render it
/// as progress output, it never affects the filtered document itself.
#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    /// Paths present in the input
    pub considered: usize,

    /// Paths retained by the whitelist
    pub included: usize,

    /// Paths dropped by the whitelist
    pub excluded: usize,

    /// Retained path templates, in input order
    pub retained_paths: Vec<String>,

    /// Closure names with no matching schema definition. Non-fatal: the
    /// names are omitted from the output schema mapping.
    pub unresolved: Vec<String>,
}

/// A filtered specification together with its report.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub spec: Value,
    pub report: FilterReport,
}

// Component sections other than `schemas` are carried through unfiltered.
const CARRIED_COMPONENTS: [&str; 5] = [
    "responses",
    "parameters",
    "requestBodies",
    "headers",
    "securitySchemes",
];

/// Filter a specification against a whitelist.
///
/// The input is never mutated; a new document is built with:
/// - `paths` reduced to entries matching an include pattern and no exclude
///   pattern (include tested first),
/// - `tags` reduced to those referenced by a retained operation, in input
///   order (omitted when none are),
/// - the schema mapping (`components.schemas` or `definitions`, whichever
///   the input used) reduced to the reference closure of the retained paths
///   and omitted entirely when the closure retains nothing,
/// - missing `info.title`/`info.version` filled from `defaults`,
/// - every other top-level field carried through unchanged.
pub fn filter_spec(
    spec: &Value,
    config: &WhitelistConfig,
    defaults: &SpecDefaults,
) -> Result<FilterOutcome> {
    let root = spec
        .as_object()
        .ok_or_else(|| SpecError::Parse("Specification root must be a mapping".to_string()))?;

    config.validate()?;

    let mut report = FilterReport::default();
    let mut retained = Map::new();
    let mut used_tags: BTreeSet<String> = BTreeSet::new();

    if let Some(paths) = root.get("paths").and_then(Value::as_object) {
        for (path, item) in paths {
            report.considered += 1;

            if !matches_any(path, &config.include_paths)? {
                report.excluded += 1;
                continue;
            }
            if !config.exclude_paths.is_empty() && matches_any(path, &config.exclude_paths)? {
                report.excluded += 1;
                continue;
            }

            report.included += 1;
            report.retained_paths.push(path.clone());
            retained.insert(path.clone(), item.clone());

            collect_operation_tags(item, &mut used_tags);
        }
    }

    let mut filtered = root.clone();
    filtered.insert("paths".to_string(), Value::Object(retained.clone()));

    apply_info_defaults(&mut filtered, defaults);
    filter_tags(&mut filtered, &used_tags);

    // Seed the closure with every reference reachable from a retained path.
    let mut seed = BTreeSet::new();
    collect_refs(&Value::Object(retained), &mut seed);

    if let Some(components) = root.get("components").and_then(Value::as_object) {
        match filter_components(components, &seed, &mut report) {
            Some(kept) => {
                filtered.insert("components".to_string(), Value::Object(kept));
            }
            None => {
                filtered.retain(|key, _| key != "components");
            }
        }
    }

    if let Some(definitions) = root.get("definitions").and_then(Value::as_object) {
        match filter_schema_map(definitions, &seed, &mut report) {
            Some(kept) => {
                filtered.insert("definitions".to_string(), Value::Object(kept));
            }
            None => {
                filtered.retain(|key, _| key != "definitions");
            }
        }
    }

    Ok(FilterOutcome {
        spec: Value::Object(filtered),
        report,
    })
}

/// Record the tags of every operation on a path item.
fn collect_operation_tags(item: &Value, used_tags: &mut BTreeSet<String>) {
    let Some(operations) = item.as_object() else {
        return;
    };
    for operation in operations.values() {
        if let Some(tags) = operation.get("tags").and_then(Value::as_array) {
            for tag in tags {
                if let Some(tag) = tag.as_str() {
                    used_tags.insert(tag.to_string());
                }
            }
        }
    }
}

/// Fill in `info.title` and `info.version` when the input omits them.
fn apply_info_defaults(spec: &mut Map<String, Value>, defaults: &SpecDefaults) {
    let info = spec
        .entry("info")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(info) = info.as_object_mut() {
        info.entry("title")
            .or_insert_with(|| Value::String(defaults.title.clone()));
        info.entry("version")
            .or_insert_with(|| Value::String(defaults.version.clone()));
    }
}

/// Reduce the tag list to tags used by a retained operation, keeping input
/// order. The field is omitted when nothing remains.
fn filter_tags(spec: &mut Map<String, Value>, used_tags: &BTreeSet<String>) {
    let Some(tags) = spec.get("tags").and_then(Value::as_array) else {
        return;
    };

    let kept: Vec<Value> = tags
        .iter()
        .filter(|tag| {
            tag.get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| used_tags.contains(name))
        })
        .cloned()
        .collect();

    if kept.is_empty() {
        // retain keeps the relative order of the surviving keys, which
        // remove (a swap-remove under preserve_order) would not
        spec.retain(|key, _| key != "tags");
    } else {
        spec.insert("tags".to_string(), Value::Array(kept));
    }
}

/// Reduce a schema mapping to the reference closure of `seed`.
///
/// Returns `None` when nothing survives, so the caller drops the field
/// instead of emitting an empty mapping. Closure names without a definition
/// are recorded on the report and omitted.
fn filter_schema_map(
    schemas: &Map<String, Value>,
    seed: &BTreeSet<String>,
    report: &mut FilterReport,
) -> Option<Map<String, Value>> {
    let closure = reference_closure(schemas, seed.clone());
    if closure.is_empty() {
        return None;
    }

    for name in &closure {
        if !schemas.contains_key(name) && !report.unresolved.contains(name) {
            report.unresolved.push(name.clone());
        }
    }

    let kept: Map<String, Value> = schemas
        .iter()
        .filter(|(name, _)| closure.contains(name.as_str()))
        .map(|(name, schema)| (name.clone(), schema.clone()))
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}

/// Filter `components.schemas` to the closure and carry the other component
/// sections through unchanged. Returns `None` when the result is empty.
fn filter_components(
    components: &Map<String, Value>,
    seed: &BTreeSet<String>,
    report: &mut FilterReport,
) -> Option<Map<String, Value>> {
    let mut filtered = Map::new();

    if let Some(schemas) = components.get("schemas").and_then(Value::as_object) {
        if let Some(kept) = filter_schema_map(schemas, seed, report) {
            filtered.insert("schemas".to_string(), Value::Object(kept));
        }
    }

    for section in CARRIED_COMPONENTS {
        if let Some(value) = components.get(section) {
            filtered.insert(section.to_string(), value.clone());
        }
    }

    if filtered.is_empty() {
        None
    } else {
        Some(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn whitelist(include: &[&str], exclude: &[&str]) -> WhitelistConfig {
        WhitelistConfig {
            include_paths: include.iter().map(|s| s.to_string()).collect(),
            exclude_paths: exclude.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn run(spec: Value, config: &WhitelistConfig) -> FilterOutcome {
        filter_spec(&spec, config, &SpecDefaults::default()).unwrap()
    }

    #[test]
    fn test_include_exclude_precedence() {
        let spec = json!({
            "paths": {
                "/a": { "get": {} },
                "/a/internal": { "get": {} },
                "/b": { "get": {} }
            }
        });

        let outcome = run(spec, &whitelist(&["/a", "/a/*"], &["/a/internal"]));
        let paths = outcome.spec["paths"].as_object().unwrap();
        assert!(paths.contains_key("/a"));
        assert!(!paths.contains_key("/a/internal"));
        assert!(!paths.contains_key("/b"));
        assert_eq!(outcome.report.considered, 3);
        assert_eq!(outcome.report.included, 1);
        assert_eq!(outcome.report.excluded, 2);
    }

    #[test]
    fn test_tags_follow_retained_operations() {
        let spec = json!({
            "tags": [{ "name": "X" }, { "name": "Y" }],
            "paths": {
                "/a": { "get": { "tags": ["X"] } },
                "/b": { "get": { "tags": ["Y"] } }
            }
        });

        let outcome = run(spec, &whitelist(&["/a"], &[]));
        assert_eq!(outcome.spec["tags"], json!([{ "name": "X" }]));
    }

    #[test]
    fn test_tags_omitted_when_no_retained_operation_is_tagged() {
        let spec = json!({
            "tags": [{ "name": "X" }],
            "paths": { "/a": { "get": {} } }
        });

        let outcome = run(spec, &whitelist(&["/a"], &[]));
        assert!(outcome.spec.get("tags").is_none());
    }

    #[test]
    fn test_schema_closure_is_transitive() {
        let spec = json!({
            "paths": {
                "/a": {
                    "get": {
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/A" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/b": {
                    "get": {
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Orphan" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "A": { "properties": { "b": { "$ref": "#/components/schemas/B" } } },
                    "B": { "properties": { "c": { "$ref": "#/components/schemas/C" } } },
                    "C": { "type": "object" },
                    "Orphan": { "type": "object" }
                }
            }
        });

        let outcome = run(spec, &whitelist(&["/a"], &[]));
        let schemas = outcome.spec["components"]["schemas"].as_object().unwrap();
        let names: Vec<&str> = schemas.keys().map(String::as_str).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn test_empty_closure_omits_schema_field() {
        let spec = json!({
            "paths": {
                "/a": { "get": { "responses": { "200": { "description": "ok" } } } }
            },
            "components": { "schemas": { "Unused": { "type": "object" } } },
            "definitions": { "AlsoUnused": { "type": "object" } }
        });

        let outcome = run(spec, &whitelist(&["/a"], &[]));
        assert!(outcome.spec.get("components").is_none());
        assert!(outcome.spec.get("definitions").is_none());
    }

    #[test]
    fn test_swagger2_definitions_are_filtered() {
        let spec = json!({
            "swagger": "2.0",
            "paths": {
                "/a": {
                    "post": {
                        "parameters": [
                            { "in": "body", "name": "body", "schema": { "$ref": "#/definitions/Widget" } }
                        ]
                    }
                }
            },
            "definitions": {
                "Widget": { "properties": { "part": { "$ref": "#/definitions/Part" } } },
                "Part": { "type": "object" },
                "Unused": { "type": "object" }
            }
        });

        let outcome = run(spec, &whitelist(&["/a"], &[]));
        let definitions = outcome.spec["definitions"].as_object().unwrap();
        let names: Vec<&str> = definitions.keys().map(String::as_str).collect();
        assert_eq!(names, ["Widget", "Part"]);
    }

    #[test]
    fn test_unresolved_references_are_reported_not_fatal() {
        let spec = json!({
            "paths": {
                "/a": { "get": { "schema": { "$ref": "#/components/schemas/Missing" } } }
            },
            "components": { "schemas": { "Present": { "type": "object" } } }
        });

        let outcome = run(spec, &whitelist(&["/a"], &[]));
        assert_eq!(outcome.report.unresolved, vec!["Missing"]);
        // The lone closure member has no definition, so nothing survives.
        assert!(outcome.spec.get("components").is_none());
    }

    #[test]
    fn test_non_schema_components_are_carried() {
        let spec = json!({
            "paths": {
                "/a": { "get": { "schema": { "$ref": "#/components/schemas/A" } } }
            },
            "components": {
                "schemas": { "A": { "type": "object" } },
                "securitySchemes": { "bearer": { "type": "http", "scheme": "bearer" } }
            }
        });

        let outcome = run(spec, &whitelist(&["/a"], &[]));
        assert_eq!(
            outcome.spec["components"]["securitySchemes"]["bearer"]["scheme"],
            "bearer"
        );
    }

    #[test]
    fn test_info_defaults_applied() {
        let spec = json!({ "paths": {} });

        let outcome = run(spec, &whitelist(&["/none"], &[]));
        assert_eq!(outcome.spec["info"]["title"], "API");
        assert_eq!(outcome.spec["info"]["version"], "1.0.0");
    }

    #[test]
    fn test_existing_info_is_preserved() {
        let spec = json!({ "info": { "title": "Billing", "version": "2.3.0" }, "paths": {} });

        let outcome = run(spec, &whitelist(&[], &[]));
        assert_eq!(outcome.spec["info"]["title"], "Billing");
        assert_eq!(outcome.spec["info"]["version"], "2.3.0");
    }

    #[test]
    fn test_unrelated_top_level_fields_pass_through() {
        let spec = json!({
            "openapi": "3.0.3",
            "servers": [{ "url": "https://api.example.com" }],
            "paths": {}
        });

        let outcome = run(spec, &whitelist(&[], &[]));
        assert_eq!(outcome.spec["openapi"], "3.0.3");
        assert_eq!(outcome.spec["servers"][0]["url"], "https://api.example.com");
    }

    #[test]
    fn test_non_mapping_root_is_parse_error() {
        let result = filter_spec(
            &json!([1, 2, 3]),
            &whitelist(&[], &[]),
            &SpecDefaults::default(),
        );
        assert!(matches!(result, Err(SpecError::Parse(_))));
    }
}
