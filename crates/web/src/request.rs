//! The request view handed to handlers.

use crate::matcher::QueryMap;
use strada_http::protocol::{Body, FieldMap, ParsedRequest};

/// One request as seen from inside a handler.
///
/// Wraps the wire-level [`ParsedRequest`] and adds what routing derives from
/// it: the matched path, extracted route parameters and the parsed query.
/// Each matching layer gets a view built against its own pattern, so `param`
/// always reflects the pattern that routed the call.
#[derive(Debug, Clone)]
pub struct Request {
    parsed: ParsedRequest,
    params: FieldMap,
    query: QueryMap,
    path: String,
}

impl Request {
    pub fn new(parsed: ParsedRequest) -> Self {
        Self { parsed, params: FieldMap::new(), query: QueryMap::default(), path: String::new() }
    }

    pub fn method(&self) -> &str {
        self.parsed.method()
    }

    /// The raw request target, query string included.
    pub fn target(&self) -> &str {
        self.parsed.target()
    }

    pub fn protocol(&self) -> &str {
        self.parsed.protocol()
    }

    pub fn version(&self) -> &str {
        self.parsed.version()
    }

    pub fn headers(&self) -> &FieldMap {
        self.parsed.headers()
    }

    /// Looks up a header regardless of the casing it arrived with.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parsed.headers().get_ignore_case(name)
    }

    pub fn body(&self) -> &Body {
        self.parsed.body()
    }

    /// The raw `Cookie` header, if the client sent one.
    pub fn cookies(&self) -> Option<&str> {
        self.header("Cookie")
    }

    /// Route parameters extracted by the pattern that matched this call.
    pub fn params(&self) -> &FieldMap {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn query(&self) -> &QueryMap {
        &self.query
    }

    /// The path component of the target, query stripped.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_params(&mut self, params: FieldMap) -> &mut Self {
        self.params = params;
        self
    }

    pub fn set_query(&mut self, query: QueryMap) -> &mut Self {
        self.query = query;
        self
    }

    pub fn set_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = path.into();
        self
    }
}
