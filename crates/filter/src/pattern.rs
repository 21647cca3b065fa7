//! Glob-style path pattern matching
//!
//! Whitelist patterns use `*` for any run of characters within one path
//! segment and `**` for any run of characters including `/`.

use regex::Regex;
use specdocs_common::{Result, SpecError};

// Placeholder for `**` during substitution. NUL cannot appear in a path
// template, so it never collides with pattern text.
const DOUBLE_STAR: &str = "\u{0}";

/// Compile one whitelist glob into an anchored regex.
///
/// Metacharacters are escaped before wildcard substitution so the regex
/// syntax produced for the wildcards is not itself escaped.
pub fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut escaped = String::with_capacity(pattern.len() * 2);
    for ch in pattern.chars() {
        match ch {
            '.' | '+' | '?' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }

    let substituted = escaped
        .replace("**", DOUBLE_STAR)
        .replace('*', "[^/]*")
        .replace(DOUBLE_STAR, ".*");

    Regex::new(&format!("^{substituted}$"))
        .map_err(|e| SpecError::Config(format!("Invalid whitelist pattern {pattern:?}: {e}")))
}

/// True if the path matches at least one pattern in the list.
///
/// Pattern order does not affect the result.
pub fn matches_any(path: &str, patterns: &[String]) -> Result<bool> {
    for pattern in patterns {
        if glob_to_regex(pattern)?.is_match(path) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(path: &str, pattern: &str) -> bool {
        glob_to_regex(pattern).unwrap().is_match(path)
    }

    #[test]
    fn test_single_star_stops_at_segment_boundary() {
        assert!(matches("/v2/organizations/{id}", "/v2/organizations/*"));
        assert!(!matches(
            "/v2/organizations/{id}/projects",
            "/v2/organizations/*"
        ));
    }

    #[test]
    fn test_double_star_crosses_segments() {
        assert!(matches("/v2/organizations/{id}/projects", "/v2/**"));
        assert!(matches("/v2", "/v2**"));
    }

    #[test]
    fn test_exact_pattern() {
        assert!(matches("/v2/workspaces", "/v2/workspaces"));
        assert!(!matches("/v2/workspaces/extra", "/v2/workspaces"));
    }

    #[test]
    fn test_pattern_is_anchored() {
        assert!(!matches("/api/v2/workspaces", "/v2/*"));
        assert!(!matches("/v2/workspaces", "workspaces"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        // Braces and dots in path templates must not be treated as regex
        // syntax.
        assert!(matches("/v2/items/{item.id}", "/v2/items/{item.id}"));
        assert!(!matches("/v2/items/Xitem_idX", "/v2/items/{item.id}"));
    }

    #[test]
    fn test_matches_any() {
        let patterns = vec!["/v1/*".to_string(), "/v2/workspaces".to_string()];
        assert!(matches_any("/v2/workspaces", &patterns).unwrap());
        assert!(matches_any("/v1/anything", &patterns).unwrap());
        assert!(!matches_any("/v3/other", &patterns).unwrap());
        assert!(!matches_any("/v2/workspaces", &[]).unwrap());
    }
}
