//! One registered (pattern, method, handler) entry in the chain.

use crate::handler::{BoxError, Flow, Handler};
use crate::matcher::{parse_url, PathMatcher, UrlParts};
use crate::request::Request;
use strada_http::protocol::{ParsedRequest, Response};

/// What a layer did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LayerOutcome {
    /// Method or pattern did not match; the layer never ran.
    NotApplicable,
    /// The handler ran and decided how the chain continues.
    Handled(Flow),
}

/// A compiled registration: the pattern as written, its matcher, the method
/// it answers to and the handler it guards.
pub struct Layer {
    pattern: String,
    method: http::Method,
    matcher: PathMatcher,
    handler: Box<dyn Handler>,
}

impl Layer {
    pub(crate) fn new(
        pattern: impl Into<String>,
        method: http::Method,
        handler: Box<dyn Handler>,
    ) -> Self {
        let pattern = pattern.into();
        let matcher = PathMatcher::new(&pattern);
        Self { pattern, method, matcher, handler }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn method(&self) -> &http::Method {
        &self.method
    }

    /// Runs the handler if method and pattern both match the request.
    ///
    /// Builds a fresh [`Request`] view against this layer's pattern, so the
    /// handler sees parameters extracted by the pattern that routed it.
    pub(crate) async fn handle(
        &self,
        parsed: &ParsedRequest,
        response: &mut Response,
    ) -> Result<LayerOutcome, BoxError> {
        if !self.method.as_str().eq_ignore_ascii_case(parsed.method()) {
            return Ok(LayerOutcome::NotApplicable);
        }

        let UrlParts { path, query } = parse_url(parsed.target())?;
        let Some(params) = self.matcher.captures(&path) else {
            return Ok(LayerOutcome::NotApplicable);
        };

        let mut request = Request::new(parsed.clone());
        request.set_params(params).set_query(query).set_path(path);

        let flow = self.handler.handle(&mut request, response).await?;
        Ok(LayerOutcome::Handled(flow))
    }
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("pattern", &self.pattern)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}
