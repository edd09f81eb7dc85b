//! Route-pattern compiler.
//!
//! Patterns are `/`-separated segments:
//! - `*` captures the rest of the path (including slashes) under [`WILDCARD_KEY`].
//! - `:name` captures one segment; `:name?` makes the whole segment optional;
//!   `:name.ext` requires a literal extension after the value.
//! - anything else is appended verbatim.
//!
//! Compilation is a pure function of `(raw, loose)`. Loose patterns accept any
//! `/`-boundary prefix of the path, strict ones allow at most one trailing slash.

use std::fmt;

use regex::Regex;

use crate::error::{RouterError, RouterResult};
use crate::params::LocationParams;

/// Parameter name assigned to `*` segments.
pub const WILDCARD_KEY: &str = "wild";

const SEGMENT: &str = "/([^/]+?)";
const OPTIONAL_SEGMENT: &str = "(?:/([^/]+?))?";
const WILDCARD: &str = "/(.*)";
const LOOSE_SUFFIX: &str = "(?:$|/)";
const STRICT_SUFFIX: &str = "/?$";

/// Compiled route pattern.
#[derive(Clone)]
pub struct RoutePattern {
    raw: String,
    loose: bool,
    keys: Vec<String>,
    matcher: Regex,
}

impl RoutePattern {
    /// Compile `raw` into a case-insensitive anchored matcher.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] when literal segment text is not
    /// valid regular-expression syntax (for example an unbalanced `(`).
    pub fn compile(raw: &str, loose: bool) -> RouterResult<Self> {
        let (source, keys) = expression_source(raw, loose);
        let matcher = Regex::new(&source).map_err(|source| RouterError::InvalidPattern {
            pattern: raw.to_string(),
            source,
        })?;
        Ok(Self {
            raw: raw.to_string(),
            loose,
            keys,
            matcher,
        })
    }

    /// Pattern as declared.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern matches on prefix boundaries.
    #[must_use]
    pub const fn is_loose(&self) -> bool {
        self.loose
    }

    /// Parameter names in declaration order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Source of the compiled regular expression.
    #[must_use]
    pub fn source(&self) -> &str {
        self.matcher.as_str()
    }

    /// Test `path` against the pattern.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Extract parameters from `path`.
    ///
    /// Every key is present in the result; keys whose group did not take part
    /// in the match, or all keys when `path` does not match, map to `None`.
    #[must_use]
    pub fn params(&self, path: &str) -> LocationParams {
        let captures = self.matcher.captures(path);
        let mut params = LocationParams::new();
        for (index, key) in self.keys.iter().enumerate() {
            let value = captures
                .as_ref()
                .and_then(|caps| caps.get(index + 1))
                .map(|found| found.as_str().to_string());
            params.insert(key.clone(), value);
        }
        params
    }
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RoutePattern")
            .field("raw", &self.raw)
            .field("loose", &self.loose)
            .field("keys", &self.keys)
            .field("source", &self.source())
            .finish()
    }
}

fn expression_source(raw: &str, loose: bool) -> (String, Vec<String>) {
    let mut segments = raw.split('/').peekable();
    if segments.peek().is_some_and(|first| first.is_empty()) {
        segments.next();
    }

    let mut keys = Vec::new();
    let mut body = String::new();
    // Stops at the first empty segment, so `/a//b` and `/a/` compile like `/a`.
    for segment in segments.take_while(|segment| !segment.is_empty()) {
        if segment.starts_with('*') {
            keys.push(WILDCARD_KEY.to_string());
            body.push_str(WILDCARD);
        } else if let Some(rest) = segment.strip_prefix(':') {
            push_parameter(rest, &mut keys, &mut body);
        } else {
            body.push('/');
            body.push_str(segment);
        }
    }

    let suffix = if loose { LOOSE_SUFFIX } else { STRICT_SUFFIX };
    (format!("(?i)^{body}{suffix}"), keys)
}

fn push_parameter(rest: &str, keys: &mut Vec<String>, body: &mut String) {
    let optional = rest.find('?');
    let extension = rest.find('.');

    let name_end = optional.or(extension).unwrap_or(rest.len());
    keys.push(rest[..name_end].to_string());

    match (optional, extension) {
        (Some(_), None) => body.push_str(OPTIONAL_SEGMENT),
        _ => body.push_str(SEGMENT),
    }
    if let Some(extension) = extension {
        // With `:name?.ext` the `?` lands after the capture group and makes the
        // value optional while the extension stays required.
        if optional.is_some() {
            body.push('?');
        }
        body.push('\\');
        body.push_str(&rest[extension..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(raw: &str, loose: bool) -> RoutePattern {
        RoutePattern::compile(raw, loose).expect("pattern compiles")
    }

    #[test]
    fn literal_pattern_requires_full_match() {
        let pattern = compile("/users", false);
        assert_eq!(pattern.source(), "(?i)^/users/?$");
        assert!(pattern.is_match("/users"));
        assert!(pattern.is_match("/users/"));
        assert!(pattern.is_match("/USERS"));
        assert!(!pattern.is_match("/users/5"));
        assert!(pattern.keys().is_empty());
    }

    #[test]
    fn named_parameter_is_extracted() {
        let pattern = compile("/users/:id", false);
        assert_eq!(pattern.keys(), ["id"]);
        assert!(pattern.is_match("/users/42"));
        assert_eq!(pattern.params("/users/42").get("id"), Some("42"));
        assert!(!pattern.is_match("/users"));
    }

    #[test]
    fn optional_parameter_matches_with_and_without_value() {
        let pattern = compile("/users/:id?", false);
        assert_eq!(pattern.source(), "(?i)^/users(?:/([^/]+?))?/?$");

        let bare = pattern.params("/users");
        assert!(pattern.is_match("/users"));
        assert!(bare.contains_key("id"));
        assert_eq!(bare.get("id"), None);

        assert_eq!(pattern.params("/users/42").get("id"), Some("42"));
    }

    #[test]
    fn wildcard_captures_remaining_path() {
        let pattern = compile("/files/*", false);
        assert_eq!(pattern.keys(), [WILDCARD_KEY]);
        assert!(pattern.is_match("/files/a/b/c.txt"));
        assert_eq!(
            pattern.params("/files/a/b/c.txt").get(WILDCARD_KEY),
            Some("a/b/c.txt")
        );
    }

    #[test]
    fn loose_mode_matches_prefix_boundaries() {
        let loose = compile("/admin", true);
        let strict = compile("/admin", false);

        assert!(loose.is_match("/admin/settings"));
        assert!(loose.is_match("/admin"));
        assert!(!loose.is_match("/administrator"));
        assert!(!strict.is_match("/admin/settings"));
        assert!(loose.is_loose());
    }

    #[test]
    fn extension_suffix_is_literal() {
        let pattern = compile("/books/:id.json", false);
        assert_eq!(pattern.keys(), ["id"]);
        assert_eq!(pattern.source(), r"(?i)^/books/([^/]+?)\.json/?$");
        assert_eq!(pattern.params("/books/7.json").get("id"), Some("7"));
        assert!(!pattern.is_match("/books/7"));
        assert!(!pattern.is_match("/books/7xjson"));
    }

    #[test]
    fn optional_parameter_with_extension_makes_value_optional() {
        let pattern = compile("/:name?.json", false);
        assert_eq!(pattern.keys(), ["name"]);
        assert_eq!(pattern.source(), r"(?i)^/([^/]+?)?\.json/?$");

        assert_eq!(pattern.params("/file.json").get("name"), Some("file"));
        assert!(pattern.is_match("/.json"));
        assert_eq!(pattern.params("/.json").get("name"), None);
        assert!(!pattern.is_match("/file"));
    }

    #[test]
    fn compilation_stops_at_empty_segment() {
        let trailing = compile("/users/", false);
        let doubled = compile("/users//:id", false);
        assert_eq!(trailing.source(), compile("/users", false).source());
        assert_eq!(doubled.source(), compile("/users", false).source());
        assert!(doubled.keys().is_empty());
    }

    #[test]
    fn empty_and_root_patterns_match_root() {
        for raw in ["", "/"] {
            let pattern = compile(raw, false);
            assert!(pattern.is_match("/"), "{raw:?} should match root");
            assert!(pattern.is_match(""), "{raw:?} should match empty path");
            assert!(!pattern.is_match("/x"), "{raw:?} should not match /x");
        }
    }

    #[test]
    fn compilation_is_deterministic() {
        let paths = ["/a/1", "/a", "/a/1/2", "/b/1", "/A/xyz/"];
        for loose in [false, true] {
            let first = compile("/a/:id?", loose);
            let second = compile("/a/:id?", loose);
            assert_eq!(first.source(), second.source());
            for path in paths {
                assert_eq!(first.is_match(path), second.is_match(path), "{path}");
                assert_eq!(first.params(path), second.params(path), "{path}");
            }
        }
    }

    #[test]
    fn non_matching_path_yields_null_params() {
        let pattern = compile("/users/:id/:tab", false);
        let params = pattern.params("/other");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("id"), None);
        assert_eq!(params.get("tab"), None);
    }

    #[test]
    fn malformed_literal_is_rejected() {
        let err = RoutePattern::compile("/broken(", false).expect_err("unbalanced group");
        assert_eq!(err.pattern(), "/broken(");
    }
}
