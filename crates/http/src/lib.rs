//! The wire-level half of the `strada` micro web framework.
//!
//! This crate turns a raw byte stream into a [`protocol::ParsedRequest`],
//! hands it to a [`handler::Handler`], and writes whatever the handler
//! commits on its [`protocol::Response`] back to the peer. It knows nothing
//! about routing or middleware; that lives in `strada-web`.
//!
//! The pieces compose like this:
//!
//! - [`codec`] frames the stream: [`codec::RequestDecoder`] buffers until a
//!   complete message is available, [`codec::ResponseEncoder`] serializes a
//!   finished response head.
//! - [`protocol`] holds the message model, the response writer with its
//!   at-most-once send guarantee, and the error types.
//! - [`connection`] ties one accepted socket to one request/response cycle.
//! - [`transport`] is the narrow write seam that lets tests swap a real
//!   socket for an in-memory sink.

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod transport;

mod utils;

pub(crate) use utils::ensure;
