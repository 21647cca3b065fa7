//! Swagger 2.0 document conversion

use serde_json::{json, Map, Value};
use specdocs_common::SpecDefaults;

const HTTP_METHODS: [&str; 7] = ["get", "post", "put", "patch", "delete", "options", "head"];

const LEGACY_REF_PREFIX: &str = "#/definitions/";
const CURRENT_REF_PREFIX: &str = "#/components/schemas/";

/// True when the document declares the Swagger 2.x dialect.
pub fn is_swagger2(spec: &Value) -> bool {
    spec.get("swagger")
        .and_then(Value::as_str)
        .is_some_and(|version| version.starts_with("2."))
}

/// Convert a Swagger 2.0 document to OpenAPI 3.0.3.
///
/// Non-2.x inputs are returned unchanged, which makes the conversion
/// idempotent. Legacy transport-negotiation fields (`swagger`, `host`,
/// `basePath`, `schemes`, `consumes`, `produces`) do not survive.
pub fn convert_to_openapi3(spec: &Value, defaults: &SpecDefaults) -> Value {
    if !is_swagger2(spec) {
        return spec.clone();
    }
    let Some(root) = spec.as_object() else {
        return spec.clone();
    };

    let mut converted = Map::new();
    converted.insert("openapi".to_string(), json!("3.0.3"));

    let info = root
        .get("info")
        .cloned()
        .unwrap_or_else(|| json!({ "title": defaults.title, "version": defaults.version }));
    converted.insert("info".to_string(), info);

    if root.contains_key("host") || root.contains_key("basePath") {
        let scheme = root
            .get("schemes")
            .and_then(Value::as_array)
            .and_then(|schemes| schemes.first())
            .and_then(Value::as_str)
            .unwrap_or("https");
        let host = root
            .get("host")
            .and_then(Value::as_str)
            .unwrap_or(&defaults.host);
        let base_path = root
            .get("basePath")
            .and_then(Value::as_str)
            .unwrap_or_default();
        converted.insert(
            "servers".to_string(),
            json!([{ "url": format!("{scheme}://{host}{base_path}") }]),
        );
    }

    let mut paths = Map::new();
    if let Some(source_paths) = root.get("paths").and_then(Value::as_object) {
        for (path, item) in source_paths {
            paths.insert(path.clone(), convert_path_item(item));
        }
    }
    converted.insert("paths".to_string(), Value::Object(paths));

    let mut components = Map::new();
    if let Some(definitions) = root.get("definitions").and_then(Value::as_object) {
        let schemas: Map<String, Value> = definitions
            .iter()
            .map(|(name, schema)| (name.clone(), rewrite_refs(schema)))
            .collect();
        components.insert("schemas".to_string(), Value::Object(schemas));
    }
    if let Some(security) = root.get("securityDefinitions").and_then(Value::as_object) {
        components.insert(
            "securitySchemes".to_string(),
            Value::Object(convert_security_definitions(security)),
        );
    }
    if !components.is_empty() {
        converted.insert("components".to_string(), Value::Object(components));
    }

    if let Some(tags) = root.get("tags") {
        converted.insert("tags".to_string(), tags.clone());
    }

    Value::Object(converted)
}

/// Rewrite every `#/definitions/` reference to `#/components/schemas/`,
/// recursively through mappings and sequences.
pub fn rewrite_refs(fragment: &Value) -> Value {
    match fragment {
        Value::Object(map) => {
            let rewritten = map
                .iter()
                .map(|(key, value)| {
                    if key == "$ref" {
                        if let Some(reference) = value.as_str() {
                            let renamed = reference.replace(LEGACY_REF_PREFIX, CURRENT_REF_PREFIX);
                            return (key.clone(), Value::String(renamed));
                        }
                    }
                    (key.clone(), rewrite_refs(value))
                })
                .collect();
            Value::Object(rewritten)
        }
        Value::Array(items) => Value::Array(items.iter().map(rewrite_refs).collect()),
        _ => fragment.clone(),
    }
}

fn convert_path_item(item: &Value) -> Value {
    let Some(entries) = item.as_object() else {
        return item.clone();
    };

    let mut converted = Map::new();
    for (key, value) in entries {
        if HTTP_METHODS.contains(&key.as_str()) {
            converted.insert(key.clone(), convert_operation(value));
        } else {
            // Non-method metadata (summary, path-level parameters) passes
            // through.
            converted.insert(key.clone(), value.clone());
        }
    }
    Value::Object(converted)
}

fn convert_operation(operation: &Value) -> Value {
    let Some(fields) = operation.as_object() else {
        return operation.clone();
    };

    let mut converted = fields.clone();

    if let Some(parameters) = fields.get("parameters").and_then(Value::as_array) {
        let non_body: Vec<Value> = parameters
            .iter()
            .filter(|p| p.get("in").and_then(Value::as_str) != Some("body"))
            .map(convert_parameter)
            .collect();
        converted.insert("parameters".to_string(), Value::Array(non_body));

        let body = parameters
            .iter()
            .find(|p| p.get("in").and_then(Value::as_str) == Some("body"));
        if let Some(body) = body {
            converted.insert("requestBody".to_string(), convert_body_parameter(body));
        }
    }

    if let Some(responses) = fields.get("responses").and_then(Value::as_object) {
        let rewritten: Map<String, Value> = responses
            .iter()
            .map(|(code, response)| (code.clone(), convert_response(response)))
            .collect();
        converted.insert("responses".to_string(), Value::Object(rewritten));
    }

    // retain keeps the remaining keys in their original order, which
    // remove (a swap-remove under preserve_order) would not
    converted.retain(|key, _| key != "consumes" && key != "produces");

    Value::Object(converted)
}

/// Body-style parameter to `requestBody` with `application/json` content.
fn convert_body_parameter(body: &Value) -> Value {
    let mut request_body = Map::new();
    for key in ["description", "required"] {
        if let Some(value) = body.get(key) {
            request_body.insert(key.to_string(), value.clone());
        }
    }

    let mut media = Map::new();
    if let Some(schema) = body.get("schema") {
        media.insert("schema".to_string(), rewrite_refs(schema));
    }
    request_body.insert(
        "content".to_string(),
        json!({ "application/json": Value::Object(media) }),
    );

    Value::Object(request_body)
}

/// Non-body parameter: flat Swagger 2.0 type information nests one level
/// deeper under `schema`. Parameters without a bare `type` pass through.
fn convert_parameter(parameter: &Value) -> Value {
    let Some(fields) = parameter.as_object() else {
        return parameter.clone();
    };
    if !fields.contains_key("type") {
        return parameter.clone();
    }

    let mut converted = Map::new();
    for key in ["name", "in", "description", "required"] {
        if let Some(value) = fields.get(key) {
            converted.insert(key.to_string(), value.clone());
        }
    }

    let mut schema = Map::new();
    for key in ["type", "format", "enum"] {
        if let Some(value) = fields.get(key) {
            schema.insert(key.to_string(), value.clone());
        }
    }
    converted.insert("schema".to_string(), Value::Object(schema));

    Value::Object(converted)
}

/// Response type information nests under `content."application/json"`.
/// Responses without a `schema` already have the 3.0 shape (or carry no
/// type information) and pass through.
fn convert_response(response: &Value) -> Value {
    let Some(fields) = response.as_object() else {
        return response.clone();
    };
    let Some(schema) = fields.get("schema") else {
        return response.clone();
    };

    let description = fields
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();

    json!({
        "description": description,
        "content": { "application/json": { "schema": rewrite_refs(schema) } }
    })
}

fn convert_security_definitions(definitions: &Map<String, Value>) -> Map<String, Value> {
    let mut schemes = Map::new();
    for (name, definition) in definitions {
        let converted = match definition.get("type").and_then(Value::as_str) {
            Some("apiKey") => {
                let mut scheme = Map::new();
                scheme.insert("type".to_string(), json!("apiKey"));
                for key in ["in", "name", "description"] {
                    if let Some(value) = definition.get(key) {
                        scheme.insert(key.to_string(), value.clone());
                    }
                }
                Some(Value::Object(scheme))
            }
            Some("oauth2") => {
                let mut implicit = Map::new();
                if let Some(url) = definition.get("authorizationUrl") {
                    implicit.insert("authorizationUrl".to_string(), url.clone());
                }
                implicit.insert(
                    "scopes".to_string(),
                    definition.get("scopes").cloned().unwrap_or_else(|| json!({})),
                );
                Some(json!({
                    "type": "oauth2",
                    "flows": { "implicit": Value::Object(implicit) }
                }))
            }
            Some("basic") => Some(json!({ "type": "http", "scheme": "basic" })),
            _ => None,
        };

        if let Some(scheme) = converted {
            schemes.insert(name.clone(), scheme);
        }
    }
    schemes
}
