//! The framework half of `strada`: routing, middleware and the server
//! harness, layered on the wire-level `strada-http` crate.
//!
//! An [`App`] is an ordered chain of layers. Each registration pairs a route
//! pattern with a method and a handler; patterns match by prefix, so a layer
//! mounted on `/api` sees every request under it. Dispatch walks the chain
//! in registration order, and each handler decides with a [`Flow`] value
//! whether the walk continues.
//!
//! ```no_run
//! use strada_web::{App, Flow, HandlerFuture, Request, Response, Server, handler_fn};
//!
//! fn hello<'a>(_req: &'a mut Request, res: &'a mut Response) -> HandlerFuture<'a> {
//!     Box::pin(async move {
//!         res.send("hello").await?;
//!         Ok(Flow::Done)
//!     })
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut app = App::new();
//!     app.register("/hello", http::Method::GET, handler_fn(hello));
//!
//!     let server = Server::builder()
//!         .address("127.0.0.1:8080")
//!         .app(app)
//!         .build()
//!         .unwrap();
//!     server.start().await;
//! }
//! ```

mod app;
mod handler;
mod layer;
mod request;
mod server;

pub mod matcher;
pub mod static_files;

pub use app::App;
pub use handler::{handler_fn, BoxError, Flow, FnHandler, Handler, HandlerFuture};
pub use layer::Layer;
pub use request::Request;
pub use server::{Server, ServerBuildError, ServerBuilder};
pub use static_files::{DeployMode, ServeDir};

pub use strada_http::protocol::{Body, FieldMap, ParsedRequest, Response};
