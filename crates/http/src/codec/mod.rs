//! Wire codecs: byte stream in, typed messages out, and back.

mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::{ResponseEncoder, ResponseHead};
