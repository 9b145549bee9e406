//! TCP transport implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::net::TcpStream;

use super::{read_exact, write_all, Transport};
use crate::error::{Error, Result};

/// TCP transport with a per-operation timeout.
pub struct TcpTransport {
    stream: TcpStream,
    read_buf: BytesMut,
    io_timeout: Duration,
}

impl TcpTransport {
    /// Connect to `addr` (`host:port`).
    pub async fn connect(addr: &str, io_timeout: Duration) -> Result<Self> {
        let stream = with_timeout(io_timeout, async {
            TcpStream::connect(addr).await.map_err(Error::from)
        })
        .await?;
        tracing::debug!(%addr, "connected");
        Ok(Self::from_stream(stream, io_timeout))
    }

    /// Wrap an already accepted stream.
    pub fn from_stream(stream: TcpStream, io_timeout: Duration) -> Self {
        // Buffers are small and sent whole; don't hold them back.
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "failed to set TCP_NODELAY");
        }
        Self {
            stream,
            read_buf: BytesMut::with_capacity(64),
            io_timeout,
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        with_timeout(self.io_timeout, write_all(&mut self.stream, data)).await
    }

    async fn recv_exact(&mut self, len: usize) -> Result<Bytes> {
        with_timeout(
            self.io_timeout,
            read_exact(&mut self.stream, &mut self.read_buf, len),
        )
        .await
    }

    async fn close(&mut self) -> Result<()> {
        use tokio::io::AsyncWriteExt;
        self.stream.shutdown().await?;
        Ok(())
    }
}

async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout),
    }
}
