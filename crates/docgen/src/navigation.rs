//! Navigation manifest patching
//!
//! Keeps the `api-reference/*` entries of a `mint.json`-style manifest in
//! sync with the current specification while leaving hand-written pages
//! alone. Groups are derived from operation tags; the page ids mirror the
//! layout the docs scraper produces (tag directory + slugified summary),
//! which is why they differ from the MDX stub ids.

use crate::pages::slugify;
use serde_json::{json, Value};
use specdocs_common::{Result, SpecError};

const NAV_METHODS: [&str; 5] = ["get", "post", "put", "patch", "delete"];

const API_REFERENCE_PREFIX: &str = "api-reference/";

// New groups insert after the group holding this page.
const INTRO_PAGE: &str = "api-reference/introduction";

/// Counters from one manifest patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavReport {
    /// Existing groups whose generated pages were replaced
    pub updated: usize,

    /// Groups newly inserted
    pub added: usize,

    /// Groups removed because nothing was left in them
    pub removed: usize,
}

/// Derive navigation groups from a specification.
///
/// Each operation lands in the group named by its first tag (capitalized,
/// `"API"` when untagged), with a page id under `api-reference/<tag>/`
/// slugified from the operation summary. Order follows first appearance in
/// the spec; duplicate page ids collapse.
pub fn groups_from_spec(spec: &Value) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();

    let Some(paths) = spec.get("paths").and_then(Value::as_object) else {
        return groups;
    };

    for (path, item) in paths {
        let Some(operations) = item.as_object() else {
            continue;
        };
        for (method, operation) in operations {
            if !NAV_METHODS.contains(&method.as_str()) {
                continue;
            }

            let tag = operation
                .get("tags")
                .and_then(Value::as_array)
                .and_then(|tags| tags.first())
                .and_then(Value::as_str)
                .unwrap_or("API");
            let label = capitalize(tag);

            let summary = operation
                .get("summary")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{method} {path}"));
            let page = format!("{API_REFERENCE_PREFIX}{tag}/{}", slugify(&summary, '-'));

            match groups.iter_mut().find(|(name, _)| *name == label) {
                Some((_, pages)) => {
                    if !pages.contains(&page) {
                        pages.push(page);
                    }
                }
                None => groups.push((label, vec![page])),
            }
        }
    }

    groups
}

/// Patch a manifest's navigation in place.
///
/// For every existing group that carries `api-reference/*` pages: replace
/// those pages with the group's current set (hand-written pages survive and
/// the merged list is sorted), or strip them when the group no longer exists
/// in the spec. Groups left with no pages are removed. Spec groups not yet
/// in the manifest insert after the "API Reference" intro group.
pub fn patch_manifest(manifest: &mut Value, groups: &[(String, Vec<String>)]) -> Result<NavReport> {
    let navigation = manifest
        .get_mut("navigation")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| {
            SpecError::Generation("Manifest has no top-level navigation array".to_string())
        })?;

    let mut report = NavReport::default();
    let mut consumed: Vec<String> = Vec::new();

    // Reverse iteration keeps unvisited indices stable across removals.
    for index in (0..navigation.len()).rev() {
        // The intro group anchors where new groups insert; its pages are
        // hand-written even though they live under the generated prefix.
        if is_intro_group(&navigation[index]) {
            continue;
        }
        let Some(entry) = navigation[index].as_object() else {
            continue;
        };
        let Some(name) = entry.get("group").and_then(Value::as_str).map(str::to_string) else {
            continue;
        };
        let pages = entry
            .get("pages")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        if !pages.iter().any(is_generated_page) {
            continue;
        }

        let mut kept: Vec<Value> = pages
            .iter()
            .filter(|page| !is_generated_page(page))
            .cloned()
            .collect();

        if let Some((_, current)) = groups.iter().find(|(group, _)| *group == name) {
            consumed.push(name);
            kept.extend(current.iter().map(|page| Value::String(page.clone())));
            sort_pages(&mut kept);
            if kept.is_empty() {
                navigation.remove(index);
                report.removed += 1;
            } else {
                set_pages(&mut navigation[index], kept);
                report.updated += 1;
            }
        } else if kept.is_empty() {
            navigation.remove(index);
            report.removed += 1;
        } else {
            set_pages(&mut navigation[index], kept);
        }
    }

    for (name, pages) in groups {
        if consumed.contains(name) || pages.is_empty() {
            continue;
        }

        let mut sorted = pages.clone();
        sorted.sort();

        let insert_at = navigation
            .iter()
            .position(is_intro_group)
            .map(|index| index + 1)
            .unwrap_or(navigation.len());
        navigation.insert(insert_at, json!({ "group": name, "pages": sorted }));
        report.added += 1;
    }

    Ok(report)
}

fn is_generated_page(page: &Value) -> bool {
    page.as_str()
        .is_some_and(|page| page.starts_with(API_REFERENCE_PREFIX))
}

fn is_intro_group(entry: &Value) -> bool {
    entry.get("group").and_then(Value::as_str) == Some("API Reference")
        && entry
            .get("pages")
            .and_then(Value::as_array)
            .is_some_and(|pages| pages.iter().any(|page| page.as_str() == Some(INTRO_PAGE)))
}

fn set_pages(entry: &mut Value, pages: Vec<Value>) {
    if let Some(entry) = entry.as_object_mut() {
        entry.insert("pages".to_string(), Value::Array(pages));
    }
}

fn sort_pages(pages: &mut [Value]) {
    pages.sort_by(|a, b| {
        a.as_str()
            .unwrap_or_default()
            .cmp(b.as_str().unwrap_or_default())
    });
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
