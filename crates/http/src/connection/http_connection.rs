//! One accepted connection, from raw halves to a handled request.

use crate::codec::RequestDecoder;
use crate::handler::Handler;
use crate::protocol::{HttpError, Response};
use crate::transport::StreamTransport;

use futures::StreamExt;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::FramedRead;
use tracing::{error, info};

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Drives the request/response cycle for a single connection.
///
/// Reads are framed through [`RequestDecoder`]; writes go through a
/// [`Response`] bound to the write half. A parse failure is answered with a
/// `400 Bad Request` carrying the parse error as its body, then surfaced to
/// the caller.
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    writer: W,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(reader: R, writer: W) -> Self {
        let framed_read =
            FramedRead::with_capacity(reader, RequestDecoder::new(), READ_BUFFER_SIZE);
        Self { framed_read, writer }
    }

    pub async fn process<H: Handler>(self, handler: Arc<H>) -> Result<(), HttpError> {
        let Self { mut framed_read, writer } = self;
        let mut response = Response::new(Box::new(StreamTransport::new(writer)));

        match framed_read.next().await {
            Some(Ok(request)) => handler.call(request, response).await,
            Some(Err(e)) => {
                error!("failed to parse request: {e}");
                response.status(400).send(&e.to_string()).await.map_err(HttpError::from)?;
                Err(e.into())
            }
            None => {
                info!("connection closed before a complete request arrived");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ParsedRequest;
    use async_trait::async_trait;
    use tokio::io::AsyncReadExt;

    struct EchoTarget;

    #[async_trait]
    impl Handler for EchoTarget {
        async fn call(
            &self,
            request: ParsedRequest,
            mut response: Response,
        ) -> Result<(), HttpError> {
            response.send(request.target()).await?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn processes_one_request() {
        let (client, server) = tokio::io::duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);
        let (mut client_read, mut client_write) = tokio::io::split(client);

        tokio::io::AsyncWriteExt::write_all(
            &mut client_write,
            b"GET /ping HTTP/1.1\r\nHost: localhost\r\n\r\n",
        )
        .await
        .unwrap();

        HttpConnection::new(server_read, server_write)
            .process(Arc::new(EchoTarget))
            .await
            .unwrap();

        let mut reply = String::new();
        client_read.read_to_string(&mut reply).await.unwrap();
        assert_eq!(
            reply,
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\n/ping"
        );
    }

    #[tokio::test]
    async fn parse_failure_is_answered_with_400() {
        let (client, server) = tokio::io::duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);
        let (mut client_read, mut client_write) = tokio::io::split(client);

        tokio::io::AsyncWriteExt::write_all(&mut client_write, b"NONSENSE\r\n\r\n")
            .await
            .unwrap();

        let result = HttpConnection::new(server_read, server_write)
            .process(Arc::new(EchoTarget))
            .await;
        assert!(result.is_err());

        let mut reply = String::new();
        client_read.read_to_string(&mut reply).await.unwrap();
        assert!(reply.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }
}
