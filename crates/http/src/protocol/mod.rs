//! Protocol-level types: errors, field maps, messages and the response
//! writer, plus the fixed status and media-type tables.

mod error;
mod fields;
mod message;
mod response;

pub mod media_type;
pub mod status;

pub use error::{HttpError, ParseError, SendError};
pub use fields::FieldMap;
pub use message::{Body, ParsedRequest};
pub use response::Response;
