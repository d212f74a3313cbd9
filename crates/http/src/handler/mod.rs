//! The seam between the wire level and whatever consumes requests.

use crate::protocol::{HttpError, ParsedRequest, Response};

use async_trait::async_trait;

/// Handles one decoded request against one response.
///
/// The connection machinery hands the handler full ownership of the parsed
/// request and the response bound to the same connection. The handler is
/// expected to commit the response exactly once before returning.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, request: ParsedRequest, response: Response) -> Result<(), HttpError>;
}
