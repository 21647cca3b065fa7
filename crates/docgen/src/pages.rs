//! MDX reference-page stub generation
//!
//! One stub per (path, HTTP method) pair of the spec, written under
//! `<output>/api-reference/<slug>/<operation>.mdx`. The stub is frontmatter
//! only; the docs renderer fills in the body from the spec itself.

use serde::Serialize;
use serde_json::Value;
use specdocs_common::{Result, SpecError};
use std::fs;
use std::path::Path;
use tera::{Context, Tera};

// Methods that get a reference page. Path-item keys outside this list
// (parameters, summary, vendor extensions) are not operations.
const PAGE_METHODS: [&str; 5] = ["get", "post", "put", "patch", "delete"];

/// Navigation coordinates of one generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRef {
    /// Navigation group label, e.g. "Workspaces"
    pub group: String,

    /// Page identifier relative to the docs root, without extension
    pub page: String,
}

/// Renders MDX stubs for every operation of a filtered specification.
pub struct PageStubGenerator {
    tera: Tera,
}

impl PageStubGenerator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            tera: crate::templates::load_templates()?,
        })
    }

    /// Write stubs under `<output_dir>/api-reference/` and return their
    /// navigation coordinates in generation order.
    pub fn generate(&self, spec: &Value, output_dir: &Path) -> Result<Vec<PageRef>> {
        let mut pages = Vec::new();
        let Some(paths) = spec.get("paths").and_then(Value::as_object) else {
            return Ok(pages);
        };

        let api_ref_dir = output_dir.join("api-reference");

        for (path, item) in paths {
            let Some(operations) = item.as_object() else {
                continue;
            };
            for (method, operation) in operations {
                if !PAGE_METHODS.contains(&method.as_str()) {
                    continue;
                }

                let slug = path_slug(path);
                let group_dir = api_ref_dir.join(&slug);
                fs::create_dir_all(&group_dir).map_err(|e| {
                    SpecError::Generation(format!(
                        "Failed to create {}: {}",
                        group_dir.display(),
                        e
                    ))
                })?;

                let operation_id = operation
                    .get("operationId")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{method}_{slug}"));
                let filename = slugify(&operation_id, '_');

                let title = operation
                    .get("summary")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{} {}", method.to_uppercase(), path));

                let mut context = Context::new();
                context.insert("title", &title);
                context.insert("method", &method.to_uppercase());
                context.insert("path", path);

                let rendered = self
                    .tera
                    .render("page.mdx", &context)
                    .map_err(|e| SpecError::Generation(format!("Template error: {}", e)))?;

                let page_path = group_dir.join(format!("{filename}.mdx"));
                fs::write(&page_path, rendered).map_err(|e| {
                    SpecError::Generation(format!("Failed to write {}: {}", page_path.display(), e))
                })?;

                pages.push(PageRef {
                    group: group_label(path),
                    page: format!("api-reference/{slug}/{filename}"),
                });
            }
        }

        Ok(pages)
    }
}

/// Last path segment with template braces stripped,
/// e.g. `/v2/workspaces/{id}/members` -> `members`.
pub(crate) fn path_slug(path: &str) -> String {
    let segment = path.split('/').filter(|s| !s.is_empty()).next_back();
    segment.unwrap_or_default().replace(['{', '}'], "")
}

/// Title-case the path slug for use as a navigation group label,
/// e.g. `/v2/api_keys` -> `Api Keys`.
fn group_label(path: &str) -> String {
    path_slug(path)
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase `name` and collapse every non-alphanumeric run to `separator`,
/// with no leading or trailing separator.
pub(crate) fn slugify(name: &str, separator: char) -> String {
    let mut result = String::with_capacity(name.len());
    let mut pending = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending && !result.is_empty() {
                result.push(separator);
            }
            pending = false;
            result.push(ch.to_ascii_lowercase());
        } else {
            pending = true;
        }
    }
    result
}
