//! HTTP request decoding from a raw byte stream.
//!
//! The decoder buffers until it has seen the full head (request line plus
//! headers, terminated by an empty line) and, when `Content-Length` is
//! present, the full declared body. Until then it yields nothing and waits
//! for more bytes. One complete message in the buffer produces exactly one
//! [`ParsedRequest`].

use crate::ensure;
use crate::protocol::{Body, FieldMap, ParseError, ParsedRequest};

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

/// Upper bound on the head (request line plus headers) in bytes
const MAX_HEAD_BYTES: usize = 8 * 1024;

/// Empty line separating head from body
const HEAD_BOUNDARY: &[u8] = b"\r\n\r\n";

/// Decoder for HTTP requests implementing the [`Decoder`] trait.
#[derive(Debug, Default)]
pub struct RequestDecoder;

impl RequestDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for RequestDecoder {
    type Item = ParsedRequest;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(boundary) = src.windows(HEAD_BOUNDARY.len()).position(|w| w == HEAD_BOUNDARY)
        else {
            // No complete head yet. Refuse to buffer without bound.
            ensure!(
                src.len() <= MAX_HEAD_BYTES,
                ParseError::too_large_header(src.len(), MAX_HEAD_BYTES)
            );
            return Ok(None);
        };
        let head_end = boundary + HEAD_BOUNDARY.len();
        ensure!(head_end <= MAX_HEAD_BYTES, ParseError::too_large_header(head_end, MAX_HEAD_BYTES));

        let head = std::str::from_utf8(&src[..boundary])
            .map_err(|e| ParseError::invalid_header(e.to_string()))?;

        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap_or("");
        let (method, target, protocol, version) = parse_request_line(request_line)?;
        let headers = parse_header_lines(lines)?;

        let declared = content_length(&headers)?;
        let available = src.len() - head_end;
        let body_len = match declared {
            // Body not fully buffered yet, keep waiting.
            Some(declared) if declared > available => return Ok(None),
            Some(declared) => declared,
            None => available,
        };

        trace!(%method, %target, body_len, "decoded request");

        let (method, target) = (method.to_owned(), target.to_owned());
        let (protocol, version) = (protocol.to_owned(), version.to_owned());
        src.advance(head_end);
        let raw_body = src.split_to(body_len);
        let body = parse_body(&raw_body, &headers)?;

        Ok(Some(ParsedRequest::new(method, target, protocol, version, headers, body)))
    }
}

/// Splits the request line into method, target, protocol name and version.
fn parse_request_line(line: &str) -> Result<(&str, &str, &str, &str), ParseError> {
    let mut parts = line.split(' ');
    let (Some(method), Some(target), Some(proto_token)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::invalid_request_line(line));
    };
    ensure!(!method.is_empty() && !target.is_empty(), ParseError::invalid_request_line(line));

    let Some((protocol, version)) = proto_token.split_once('/') else {
        return Err(ParseError::invalid_request_line(line));
    };
    Ok((method, target, protocol, version))
}

/// Parses `Key: Value` header lines, preserving arrival order and casing.
/// A repeated key keeps the last value.
fn parse_header_lines<'a>(
    lines: impl Iterator<Item = &'a str>,
) -> Result<FieldMap, ParseError> {
    let mut headers = FieldMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(ParseError::invalid_header(format!("malformed header line: {line}")));
        };
        headers.insert(key, value.trim());
    }
    Ok(headers)
}

/// Reads the declared body length, if any.
fn content_length(headers: &FieldMap) -> Result<Option<usize>, ParseError> {
    headers
        .get_ignore_case("Content-Length")
        .map(|value| {
            value.parse().map_err(|_| {
                ParseError::invalid_content_length(format!("not a length: {value:?}"))
            })
        })
        .transpose()
}

/// Interprets the raw body bytes according to the declared content type.
fn parse_body(raw: &[u8], headers: &FieldMap) -> Result<Body, ParseError> {
    if raw.is_empty() {
        return Ok(Body::Empty);
    }

    let is_json = headers
        .get_ignore_case("Content-Type")
        .is_some_and(|ct| {
            ct.split(';')
                .next()
                .is_some_and(|essence| {
                    essence.trim().eq_ignore_ascii_case(mime::APPLICATION_JSON.essence_str())
                })
        });
    if is_json {
        let value = serde_json::from_slice(raw)
            .map_err(|e| ParseError::invalid_json_body(e.to_string()))?;
        return Ok(Body::Json(value));
    }

    let text = String::from_utf8(raw.to_vec())
        .map_err(|e| ParseError::invalid_body(e.to_string()))?;
    Ok(Body::Text(text))
}
