//! HTTP response head serialization.
//!
//! This module serializes a fully-computed [`ResponseHead`] into its wire
//! form: the status line, one `Key: Value` line per field in insertion
//! order, and the terminating blank line. Header policy (the computed
//! `Content-Type` and `Content-Length` pair, reserved-key filtering, cookie
//! folding) is applied by the response writer before a head reaches this
//! encoder; by this point the field list is final.

use crate::protocol::{FieldMap, SendError};

use bytes::{BufMut, BytesMut};
use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Initial buffer size reserved for head serialization
const INIT_HEAD_SIZE: usize = 1024;

/// A response head ready for serialization: status line parts plus the final
/// ordered field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    status: u16,
    reason: Option<&'static str>,
    fields: FieldMap,
}

impl ResponseHead {
    pub fn new(status: u16, reason: Option<&'static str>, fields: FieldMap) -> Self {
        Self { status, reason, fields }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> Option<&'static str> {
        self.reason
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }
}

/// Encoder for response heads implementing the [`Encoder`] trait.
#[derive(Debug, Default)]
pub struct ResponseEncoder;

impl Encoder<ResponseHead> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, head: ResponseHead, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEAD_SIZE);

        // A code outside the fixed table carries an empty reason phrase
        // rather than an invented one.
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", head.status, head.reason.unwrap_or(""))?;

        for (key, value) in head.fields.iter() {
            dst.put_slice(key.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// Avoids unnecessary bounds checking when formatting into the buffer,
/// since we've already reserved enough space.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(head: ResponseHead) -> String {
        let mut buf = BytesMut::new();
        ResponseEncoder.encode(head, &mut buf).unwrap();
        String::from_utf8(buf.to_vec()).unwrap()
    }

    #[test]
    fn fields_are_written_in_order() {
        let fields: FieldMap =
            [("Content-Type", "text/plain"), ("Content-Length", "2"), ("X-Custom", "yes")].into_iter().collect();
        let wire = encode(ResponseHead::new(200, Some("OK"), fields));

        assert_eq!(
            wire,
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\nX-Custom: yes\r\n\r\n"
        );
    }

    #[test]
    fn unknown_status_has_empty_reason() {
        let wire = encode(ResponseHead::new(299, None, FieldMap::new()));
        assert_eq!(wire, "HTTP/1.1 299 \r\n\r\n");
    }
}
