//! The handler contract and the plain-function adapter.

use crate::request::Request;
use strada_http::protocol::Response;

use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

/// Boxed error type carried out of handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What a handler decided about the rest of the chain.
///
/// `Next` passes control to the next matching layer; `Done` stops the
/// dispatch loop. There is no way for a layer to resume the chain after
/// returning, which is what makes the loop's ordering airtight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Next,
    Done,
}

/// The future returned by a plain-function handler.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Flow, BoxError>> + Send + 'a>>;

/// One unit of request-handling work, middleware and endpoints alike.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, request: &mut Request, response: &mut Response)
        -> Result<Flow, BoxError>;
}

/// Adapts a plain async function to [`Handler`].
///
/// Written for `fn` items of the shape
/// `fn hello(req: &mut Request, res: &mut Response) -> HandlerFuture<'_>`
/// whose body is `Box::pin(async move { ... })`.
pub struct FnHandler<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

/// Wraps a plain function as a handler.
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response) -> HandlerFuture<'a> + Send + Sync,
{
    FnHandler { f }
}

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response) -> HandlerFuture<'a> + Send + Sync,
{
    async fn handle(
        &self,
        request: &mut Request,
        response: &mut Response,
    ) -> Result<Flow, BoxError> {
        (self.f)(&mut *request, &mut *response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_is_handler<H: Handler>(_: &H) {}

    fn greet<'a>(_req: &'a mut Request, _res: &'a mut Response) -> HandlerFuture<'a> {
        Box::pin(async move { Ok(Flow::Done) })
    }

    #[test]
    fn plain_functions_adapt_to_handlers() {
        let handler = handler_fn(greet);
        assert_is_handler(&handler);
    }
}
