//! The application: an ordered chain of layers and the dispatch loop.

use crate::handler::{Flow, Handler};
use crate::layer::{Layer, LayerOutcome};
use strada_http::protocol::{HttpError, ParsedRequest, Response};

use async_trait::async_trait;
use tracing::{debug, warn};

/// An ordered collection of routes and middleware.
///
/// Layers run strictly in registration order. Dispatch is a plain loop: each
/// matching layer runs to completion and returns [`Flow::Next`] to pass
/// control on or [`Flow::Done`] to stop. Control can never re-enter a layer
/// that already returned.
#[derive(Debug, Default)]
pub struct App {
    layers: Vec<Layer>,
}

impl App {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Registers a handler for a pattern and method, appended to the end of
    /// the chain.
    ///
    /// The root pattern `"/"` is normalized to the empty mount so it matches
    /// every path, which is how catch-all middleware registers.
    pub fn register(
        &mut self,
        pattern: &str,
        method: http::Method,
        handler: impl Handler + 'static,
    ) -> &mut Self {
        let pattern = if pattern == "/" { "" } else { pattern };
        self.layers.push(Layer::new(pattern, method, Box::new(handler)));
        self
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Runs the chain for one request.
    ///
    /// A handler error stops the loop and is answered with a `400` carrying
    /// the error text. If no layer commits the response by the time the
    /// chain is exhausted, a single `404 Not Found` goes out instead.
    pub async fn dispatch(
        &self,
        request: ParsedRequest,
        mut response: Response,
    ) -> Result<(), HttpError> {
        for layer in &self.layers {
            match layer.handle(&request, &mut response).await {
                Ok(LayerOutcome::NotApplicable | LayerOutcome::Handled(Flow::Next)) => {}
                Ok(LayerOutcome::Handled(Flow::Done)) => return Ok(()),
                Err(e) => {
                    warn!(pattern = layer.pattern(), "handler failed: {e}");
                    response.status(400).send(&e.to_string()).await?;
                    return Ok(());
                }
            }
        }

        if !response.is_sent() {
            debug!("no layer answered for {}", request.target());
            response.status(404).send("Not found").await?;
        }
        Ok(())
    }
}

#[async_trait]
impl strada_http::handler::Handler for App {
    async fn call(&self, request: ParsedRequest, response: Response) -> Result<(), HttpError> {
        self.dispatch(request, response).await
    }
}
