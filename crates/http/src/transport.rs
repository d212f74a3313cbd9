//! The byte-sink side of a connection.
//!
//! The response writer needs exactly two capabilities from the transport:
//! push bytes to the peer and close the stream. Keeping the seam this narrow
//! lets tests substitute an in-memory sink for a real TCP stream.

use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// A write-only view of one connection.
#[async_trait]
pub trait Transport: Send {
    /// Pushes bytes to the peer.
    async fn push(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Ends the stream. Further pushes are invalid.
    async fn close(&mut self) -> io::Result<()>;
}

/// Adapts an async byte stream (typically the write half of a TCP
/// connection) to the [`Transport`] seam.
#[derive(Debug)]
pub struct StreamTransport<W> {
    writer: W,
}

impl<W> StreamTransport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl<W> Transport for StreamTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn push(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes).await
    }

    async fn close(&mut self) -> io::Result<()> {
        self.writer.shutdown().await
    }
}
