//! Parsed request message types.

use crate::protocol::FieldMap;
use serde_json::Value;

/// One structured HTTP request, produced once per inbound message.
///
/// Immutable after parsing; the dispatcher owns it for the duration of one
/// request cycle. `target` is the raw request target (path plus query),
/// `protocol` and `version` are the two halves of the protocol token
/// (`HTTP/1.1` becomes `"HTTP"` and `"1.1"`). Header names keep the casing
/// they arrived with.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    method: String,
    target: String,
    protocol: String,
    version: String,
    headers: FieldMap,
    body: Body,
}

impl ParsedRequest {
    pub fn new(
        method: impl Into<String>,
        target: impl Into<String>,
        protocol: impl Into<String>,
        version: impl Into<String>,
        headers: FieldMap,
        body: Body,
    ) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            protocol: protocol.into(),
            version: version.into(),
            headers,
            body,
        }
    }

    /// The method token exactly as it arrived; comparisons against
    /// registered routes are case-insensitive.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The raw request target, path and query string included.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &FieldMap {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }
}

/// A request body as delivered with the message.
///
/// Bodies announced as JSON are parsed into a structured value at decode
/// time; everything else stays raw text.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Text(String),
    Json(Value),
}

impl Body {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    /// Returns the raw text if this is a text body.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the parsed value if this is a JSON body.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }
}
