//! Route patterns and request-target parsing.
//!
//! A pattern is compiled once at registration into a [`PathMatcher`]. A
//! pattern matches any path it is a *prefix* of, respecting segment
//! boundaries, which is what lets middleware mount on `/api` and see
//! `/api/users/42`. Segments starting with `:` become named captures;
//! everything else is matched literally.

use strada_http::protocol::FieldMap;

use regex::Regex;
use thiserror::Error;

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    source: String,
    regex: Regex,
    names: Vec<String>,
}

impl PathMatcher {
    /// Compiles a pattern such as `/users/:id/posts/:post_id`.
    ///
    /// # Panics
    ///
    /// Panics on a parameter segment with an empty name (`/users/:`).
    /// Patterns are authored at registration time, so this is a programming
    /// error rather than a runtime condition.
    pub fn new(pattern: &str) -> Self {
        let mut expr = String::from("^");
        let mut names = Vec::new();

        for segment in pattern.split('/') {
            if let Some(name) = segment.strip_prefix(':') {
                assert!(!name.is_empty(), "route parameter in {pattern:?} has no name");
                expr.push_str("/([^/]+)");
                names.push(name.to_owned());
            } else if !segment.is_empty() {
                expr.push('/');
                expr.push_str(&regex::escape(segment));
            }
        }

        // The tail accepts any deeper path but only at a segment boundary,
        // so `/users` matches `/users/42` and not `/users123`.
        expr.push_str("(?:/.*)?$");

        let regex = Regex::new(&expr).unwrap_or_else(|e| {
            panic!("failed to compile route pattern {pattern:?}: {e}");
        });
        Self { source: pattern.to_owned(), regex, names }
    }

    /// The pattern as registered.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn param_names(&self) -> &[String] {
        &self.names
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches `path` and extracts named parameters in declaration order.
    pub fn captures(&self, path: &str) -> Option<FieldMap> {
        let caps = self.regex.captures(path)?;
        let params = self
            .names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                caps.get(i + 1).map(|m| (name.clone(), m.as_str().to_owned()))
            })
            .collect();
        Some(params)
    }
}

/// A request target split into its path and parsed query string.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlParts {
    pub path: String,
    pub query: QueryMap,
}

/// Errors from request-target parsing.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("invalid request target: {target:?}")]
    InvalidTarget { target: String },
    #[error("invalid query string: {reason}")]
    InvalidQuery { reason: String },
}

/// Splits a raw request target into path and query.
pub fn parse_url(target: &str) -> Result<UrlParts, UrlError> {
    let uri: http::Uri = target
        .parse()
        .map_err(|_| UrlError::InvalidTarget { target: target.to_owned() })?;

    let query = match uri.query() {
        Some(raw) => parse_query(raw)?,
        None => QueryMap::default(),
    };
    Ok(UrlParts { path: uri.path().to_owned(), query })
}

fn parse_query(raw: &str) -> Result<QueryMap, UrlError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)
        .map_err(|e| UrlError::InvalidQuery { reason: e.to_string() })?;

    let mut query = QueryMap::default();
    for (key, value) in pairs {
        query.append(key, value);
    }
    Ok(query)
}

/// One query key's value: scalar until the key repeats.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

/// Parsed query parameters in arrival order. A repeated key promotes its
/// value from scalar to list, appending in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryMap {
    entries: Vec<(String, QueryValue)>,
}

impl QueryMap {
    pub fn append(&mut self, key: String, value: String) {
        let Some(position) = self.entries.iter().position(|(k, _)| *k == key) else {
            self.entries.push((key, QueryValue::One(value)));
            return;
        };
        match &mut self.entries[position].1 {
            QueryValue::One(existing) => {
                let first = std::mem::take(existing);
                self.entries[position].1 = QueryValue::Many(vec![first, value]);
            }
            QueryValue::Many(values) => values.push(value),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_matches_prefix() {
        let matcher = PathMatcher::new("/users");

        assert!(matcher.matches("/users"));
        assert!(matcher.matches("/users/42/posts"));
        assert!(!matcher.matches("/accounts/users"));
    }

    #[test]
    fn prefix_stops_at_segment_boundaries() {
        let matcher = PathMatcher::new("/users");

        assert!(!matcher.matches("/users123"));
        assert!(matcher.matches("/users/"));
    }

    #[test]
    fn params_are_captured_in_order() {
        let matcher = PathMatcher::new("/users/:id/posts/:post_id");

        let params = matcher.captures("/users/42/posts/7").unwrap();
        let collected: Vec<_> = params.iter().collect();
        assert_eq!(collected, vec![("id", "42"), ("post_id", "7")]);
    }

    #[test]
    fn params_capture_with_trailing_path() {
        let matcher = PathMatcher::new("/users/:id");

        let params = matcher.captures("/users/42/extra/segments").unwrap();
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn param_must_fill_its_segment() {
        let matcher = PathMatcher::new("/users/:id");

        assert!(matcher.captures("/users/").is_none());
        assert!(matcher.captures("/users").is_none());
    }

    #[test]
    fn empty_pattern_matches_everything() {
        let matcher = PathMatcher::new("");

        assert!(matcher.matches("/"));
        assert!(matcher.matches("/anything/at/all"));
        assert!(matcher.captures("/x").unwrap().is_empty());
    }

    #[test]
    fn parse_url_splits_path_and_query() {
        let parts = parse_url("/search?q=rust&page=2").unwrap();

        assert_eq!(parts.path, "/search");
        assert_eq!(parts.query.get("q"), Some(&QueryValue::One("rust".into())));
        assert_eq!(parts.query.get("page"), Some(&QueryValue::One("2".into())));
    }

    #[test]
    fn repeated_query_key_promotes_to_list() {
        let parts = parse_url("/q?a=1&b=2&a=3").unwrap();

        assert_eq!(
            parts.query.get("a"),
            Some(&QueryValue::Many(vec!["1".into(), "3".into()]))
        );
        assert_eq!(parts.query.get("b"), Some(&QueryValue::One("2".into())));
        assert_eq!(parts.query.len(), 2);
    }

    #[test]
    fn query_values_are_percent_decoded() {
        let parts = parse_url("/q?msg=hello%20world").unwrap();

        assert_eq!(parts.query.get("msg"), Some(&QueryValue::One("hello world".into())));
    }
}
