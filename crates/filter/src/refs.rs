//! Schema reference discovery and transitive closure

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Reference pointer dialects recognized by the walker.
///
/// Both encode "substitute the named schema definition here"; they differ
/// only in the `$ref` prefix convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefDialect {
    /// OpenAPI 3.0: `#/components/schemas/<name>`
    OpenApi3,

    /// Swagger 2.0: `#/definitions/<name>`
    Swagger2,
}

impl RefDialect {
    /// All dialects, in recognition order.
    pub const ALL: [RefDialect; 2] = [RefDialect::OpenApi3, RefDialect::Swagger2];

    /// The `$ref` prefix this dialect uses for schema references.
    pub fn prefix(self) -> &'static str {
        match self {
            RefDialect::OpenApi3 => "#/components/schemas/",
            RefDialect::Swagger2 => "#/definitions/",
        }
    }

    /// Extract the schema name from a `$ref` string in this dialect.
    pub fn schema_name(self, reference: &str) -> Option<&str> {
        reference
            .strip_prefix(self.prefix())
            .filter(|name| !name.is_empty())
    }
}

/// Extract the schema name from a `$ref` string in whichever dialect
/// recognizes it first.
fn ref_schema_name(reference: &str) -> Option<&str> {
    RefDialect::ALL
        .iter()
        .find_map(|dialect| dialect.schema_name(reference))
}

/// Collect every schema name referenced anywhere inside a fragment.
///
/// Depth-first over mappings and sequences; scalars contribute nothing. A
/// mapping contributes its own `$ref` (when recognized) and is still
/// traversed in full, so a reference node carrying extra descendant data
/// loses nothing.
pub fn collect_refs(fragment: &Value, refs: &mut BTreeSet<String>) {
    match fragment {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                if let Some(name) = ref_schema_name(reference) {
                    refs.insert(name.to_string());
                }
            }
            for value in map.values() {
                collect_refs(value, refs);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_refs(item, refs);
            }
        }
        _ => {}
    }
}

/// Compute the smallest superset of `seed` closed under "the definition for
/// a name in the set references another name".
///
/// Fixed-point iteration: each pass walks every definition currently in the
/// set and unions in what it references, stopping when a pass adds nothing.
/// Cyclic definitions terminate because re-visiting an already-present name
/// contributes no new members. Seed names with no definition stay in the
/// closure but expand nothing.
pub fn reference_closure(
    definitions: &Map<String, Value>,
    seed: BTreeSet<String>,
) -> BTreeSet<String> {
    let mut closure = seed;
    loop {
        let before = closure.len();
        let mut discovered = BTreeSet::new();
        for name in &closure {
            if let Some(definition) = definitions.get(name) {
                collect_refs(definition, &mut discovered);
            }
        }
        closure.extend(discovered);
        if closure.len() == before {
            return closure;
        }
    }
}
