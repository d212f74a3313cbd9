//! The response model and writer.
//!
//! A [`Response`] accumulates status, headers, cookies and a charset through
//! chained setters, then commits exactly once through one of the terminal
//! methods (`send`, `json`, `send_file`, `redirect`, `end`). The head is
//! computed in full at commit time, serialized with the codec-level encoder,
//! and pushed to the transport together with the body. A second commit
//! attempt fails with [`SendError::AlreadySent`].

use crate::codec::{ResponseEncoder, ResponseHead};
use crate::protocol::{status, FieldMap, SendError};
use crate::protocol::media_type::content_type_for;
use crate::transport::Transport;

use bytes::BytesMut;
use serde::Serialize;
use tokio_util::codec::Encoder;
use tracing::error;

/// Header keys the writer computes itself. User-set values under these keys
/// are dropped (case-insensitively) when the head is built.
const RESERVED_KEYS: [&str; 3] = ["Content-Length", "Set-Cookie", "Location"];

/// An in-flight HTTP response bound to one connection.
pub struct Response {
    transport: Box<dyn Transport>,
    status_code: u16,
    reason: Option<&'static str>,
    headers: FieldMap,
    cookies: FieldMap,
    charset: Option<String>,
    location: Option<String>,
    sent: bool,
}

impl Response {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            status_code: 200,
            reason: status::reason_phrase(200),
            headers: FieldMap::new(),
            cookies: FieldMap::new(),
            charset: None,
            location: None,
            sent: false,
        }
    }

    /// Sets the status code. The reason phrase follows from the fixed table;
    /// codes outside it get an empty reason on the wire.
    pub fn status(&mut self, code: u16) -> &mut Self {
        self.status_code = code;
        self.reason = status::reason_phrase(code);
        self
    }

    /// Sets a header. Setting the same key again overwrites the value in
    /// place without changing its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Adds a cookie. All cookies are folded into a single `Set-Cookie`
    /// field at commit time.
    pub fn cookie(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Sets the charset appended to the computed `Content-Type`.
    pub fn charset(&mut self, charset: impl Into<String>) -> &mut Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn reason(&self) -> Option<&'static str> {
        self.reason
    }

    /// Whether a commit has already gone out on this response.
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Commits the response with a plain-text body.
    pub async fn send(&mut self, body: &str) -> Result<(), SendError> {
        let head = self.build_head(mime::TEXT_PLAIN.as_ref(), body.len());
        self.write(head, body.as_bytes()).await
    }

    /// Commits the response with a JSON body serialized from `value`.
    pub async fn json<T>(&mut self, value: &T) -> Result<(), SendError>
    where
        T: Serialize + ?Sized,
    {
        let body =
            serde_json::to_string(value).map_err(|e| SendError::invalid_body(e.to_string()))?;
        let head = self.build_head(mime::APPLICATION_JSON.as_ref(), body.len());
        self.write(head, body.as_bytes()).await
    }

    /// Commits the response with a file body, inferring the content type
    /// from the extension.
    pub async fn send_file(&mut self, extension: &str, contents: &[u8]) -> Result<(), SendError> {
        let head = self.build_head(content_type_for(extension), contents.len());
        self.write(head, contents).await
    }

    /// Commits a `302 Found` redirect to `target`. The target doubles as a
    /// plain-text body for clients that do not follow redirects.
    pub async fn redirect(&mut self, target: &str) -> Result<(), SendError> {
        self.location = Some(target.to_owned());
        self.status(302).send(target).await
    }

    /// Commits the response with an empty body.
    pub async fn end(&mut self) -> Result<(), SendError> {
        let head = self.build_head(mime::TEXT_PLAIN.as_ref(), 0);
        self.write(head, &[]).await
    }

    /// Computes the final field list for the head.
    ///
    /// Order on the wire: computed `Content-Type` and `Content-Length`,
    /// user headers (minus reserved keys), `Location`, folded `Set-Cookie`.
    /// A user-set `Content-Type` overwrites the computed one in place.
    fn build_head(&self, content_type: &str, content_length: usize) -> ResponseHead {
        let mut fields = FieldMap::new();

        let content_type = match &self.charset {
            Some(charset) => format!("{content_type}; charset={charset}"),
            None => content_type.to_owned(),
        };
        fields.insert("Content-Type", content_type);
        fields.insert("Content-Length", content_length.to_string());

        for (key, value) in self.headers.iter() {
            if RESERVED_KEYS.iter().any(|reserved| reserved.eq_ignore_ascii_case(key)) {
                continue;
            }
            fields.insert(key, value);
        }

        if let Some(location) = &self.location {
            fields.insert("Location", location.clone());
        }

        if !self.cookies.is_empty() {
            let folded = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            fields.insert("Set-Cookie", folded);
        }

        ResponseHead::new(self.status_code, self.reason, fields)
    }

    /// Serializes and pushes the head and body, enforcing at-most-once send.
    ///
    /// The sent flag flips before the first push so a re-entrant commit
    /// cannot slip through, and rolls back if the transport fails so the
    /// caller may retry or emit an error response instead.
    async fn write(&mut self, head: ResponseHead, body: &[u8]) -> Result<(), SendError> {
        if self.sent {
            return Err(SendError::AlreadySent);
        }

        let mut buf = BytesMut::new();
        ResponseEncoder.encode(head, &mut buf)?;

        self.sent = true;
        if let Err(e) = Self::push_all(&mut *self.transport, &buf, body).await {
            self.sent = false;
            error!("failed to write response to transport: {e}");
            return Err(SendError::io(e));
        }
        Ok(())
    }

    async fn push_all(
        transport: &mut dyn Transport,
        head: &[u8],
        body: &[u8],
    ) -> std::io::Result<()> {
        transport.push(head).await?;
        if !body.is_empty() {
            transport.push(body).await?;
        }
        transport.close().await
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status_code", &self.status_code)
            .field("reason", &self.reason)
            .field("headers", &self.headers)
            .field("cookies", &self.cookies)
            .field("charset", &self.charset)
            .field("location", &self.location)
            .field("sent", &self.sent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// In-memory transport capturing everything pushed to it.
    #[derive(Default)]
    struct SinkState {
        bytes: Vec<u8>,
        closed: bool,
        fail_writes: bool,
    }

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<SinkState>>);

    impl SharedSink {
        fn failing() -> Self {
            let sink = Self::default();
            sink.0.lock().unwrap().fail_writes = true;
            sink
        }

        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().bytes.clone()).unwrap()
        }

        fn is_closed(&self) -> bool {
            self.0.lock().unwrap().closed
        }
    }

    #[async_trait]
    impl Transport for SharedSink {
        async fn push(&mut self, bytes: &[u8]) -> io::Result<()> {
            let mut state = self.0.lock().unwrap();
            if state.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink refused write"));
            }
            state.bytes.extend_from_slice(bytes);
            Ok(())
        }

        async fn close(&mut self) -> io::Result<()> {
            self.0.lock().unwrap().closed = true;
            Ok(())
        }
    }

    fn response_over(sink: &SharedSink) -> Response {
        Response::new(Box::new(sink.clone()))
    }

    #[tokio::test]
    async fn send_writes_complete_message() {
        let sink = SharedSink::default();
        let mut response = response_over(&sink);

        response.send("hi").await.unwrap();

        assert_eq!(
            sink.contents(),
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\n\r\nhi"
        );
        assert!(sink.is_closed());
        assert!(response.is_sent());
    }

    #[tokio::test]
    async fn second_send_fails_without_writing() {
        let sink = SharedSink::default();
        let mut response = response_over(&sink);

        response.send("first").await.unwrap();
        let written = sink.contents();

        let err = response.send("second").await.unwrap_err();
        assert!(matches!(err, SendError::AlreadySent));
        assert_eq!(sink.contents(), written);
    }

    #[tokio::test]
    async fn status_line_uses_table_reason() {
        let sink = SharedSink::default();
        let mut response = response_over(&sink);

        response.status(404).send("").await.unwrap();

        assert!(sink.contents().starts_with("HTTP/1.1 404 Not Found\r\n"));
    }

    #[tokio::test]
    async fn unknown_status_gets_empty_reason() {
        let sink = SharedSink::default();
        let mut response = response_over(&sink);

        response.status(999).send("").await.unwrap();

        assert!(sink.contents().starts_with("HTTP/1.1 999 \r\n"));
        assert_eq!(response.reason(), None);
    }

    #[tokio::test]
    async fn cookies_fold_into_one_field() {
        let sink = SharedSink::default();
        let mut response = response_over(&sink);

        response.cookie("session", "abc").cookie("theme", "dark");
        response.send("").await.unwrap();

        assert!(sink.contents().contains("Set-Cookie: session=abc; theme=dark\r\n"));
    }

    #[tokio::test]
    async fn reserved_headers_are_dropped() {
        let sink = SharedSink::default();
        let mut response = response_over(&sink);

        response
            .set("content-length", "9999")
            .set("Set-Cookie", "forged=1")
            .set("LOCATION", "/elsewhere")
            .set("X-Kept", "yes");
        response.send("ok").await.unwrap();

        let wire = sink.contents();
        assert!(wire.contains("Content-Length: 2\r\n"));
        assert!(wire.contains("X-Kept: yes\r\n"));
        assert!(!wire.contains("9999"));
        assert!(!wire.contains("forged"));
        assert!(!wire.contains("/elsewhere"));
    }

    #[tokio::test]
    async fn user_content_type_overwrites_computed_in_place() {
        let sink = SharedSink::default();
        let mut response = response_over(&sink);

        response.set("Content-Type", "text/markdown");
        response.send("# hi").await.unwrap();

        assert!(sink.contents().starts_with(
            "HTTP/1.1 200 OK\r\nContent-Type: text/markdown\r\nContent-Length: 4\r\n"
        ));
    }

    #[tokio::test]
    async fn charset_is_appended_to_content_type() {
        let sink = SharedSink::default();
        let mut response = response_over(&sink);

        response.charset("utf-8");
        response.send("hé").await.unwrap();

        assert!(sink.contents().contains("Content-Type: text/plain; charset=utf-8\r\n"));
    }

    #[tokio::test]
    async fn json_serializes_body_and_content_type() {
        let sink = SharedSink::default();
        let mut response = response_over(&sink);

        response.json(&serde_json::json!({ "id": 7 })).await.unwrap();

        let wire = sink.contents();
        assert!(wire.contains("Content-Type: application/json\r\n"));
        assert!(wire.ends_with("\r\n\r\n{\"id\":7}"));
    }

    #[tokio::test]
    async fn send_file_infers_content_type() {
        let sink = SharedSink::default();
        let mut response = response_over(&sink);

        response.send_file("html", b"<h1>hi</h1>").await.unwrap();

        let wire = sink.contents();
        assert!(wire.contains("Content-Type: text/html; charset=UTF-8\r\n"));
        assert!(wire.ends_with("<h1>hi</h1>"));
    }

    #[tokio::test]
    async fn redirect_sets_status_and_location() {
        let sink = SharedSink::default();
        let mut response = response_over(&sink);

        response.redirect("/login").await.unwrap();

        let wire = sink.contents();
        assert!(wire.starts_with("HTTP/1.1 302 Found\r\n"));
        assert!(wire.contains("Location: /login\r\n"));
        assert!(wire.ends_with("/login"));
    }

    #[tokio::test]
    async fn transport_failure_rolls_back_sent_flag() {
        let sink = SharedSink::failing();
        let mut response = response_over(&sink);

        let err = response.send("lost").await.unwrap_err();
        assert!(matches!(err, SendError::Io { .. }));
        assert!(!response.is_sent());
    }

    #[tokio::test]
    async fn end_sends_empty_body() {
        let sink = SharedSink::default();
        let mut response = response_over(&sink);

        response.status(204).end().await.unwrap();

        let wire = sink.contents();
        assert!(wire.starts_with("HTTP/1.1 204 No Content\r\n"));
        assert!(wire.contains("Content-Length: 0\r\n"));
        assert!(wire.ends_with("\r\n\r\n"));
    }
}
