//! Echo peer: decodes each request and sends back a re-encoded copy.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::record::{hex_dump, ScalarRecord};
use crate::transport::{TcpTransport, Transport};

/// TCP echo server for [`ScalarRecord`] buffers.
pub struct EchoServer {
    listener: TcpListener,
    config: HarnessConfig,
}

impl EchoServer {
    /// Bind to `config.addr`. Port 0 picks an ephemeral port.
    pub async fn bind(config: HarnessConfig) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(config.addr.as_str()).await?;
        tracing::info!(addr = %listener.local_addr()?, "listening, ready to accept");
        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever, one task per connection.
    pub async fn run(self) -> Result<()> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            let config = self.config.clone();
            tokio::spawn(async move {
                let mut transport = TcpTransport::from_stream(stream, config.io_timeout);
                if let Err(e) = echo(&mut transport, config.buffer_size).await {
                    tracing::warn!(%peer, error = %e, "echo failed");
                }
            });
        }
    }

    /// Accept and serve a single connection.
    pub async fn serve_one(&self) -> Result<()> {
        let (stream, peer) = self.listener.accept().await?;
        tracing::debug!(%peer, "accepted");
        let mut transport = TcpTransport::from_stream(stream, self.config.io_timeout);
        echo(&mut transport, self.config.buffer_size).await
    }
}

/// Receive one buffer, decode it, and reply with the re-encoded record.
pub async fn echo<T: Transport>(transport: &mut T, buffer_size: usize) -> Result<()> {
    let request = transport.recv_exact(buffer_size).await?;
    tracing::debug!(bytes = %hex_dump(&request), "request");

    let record = ScalarRecord::decode_from(&request)?;
    tracing::info!(?record, "decoded request");

    let mut reply = vec![0u8; buffer_size];
    record.encode_into(&mut reply)?;
    tracing::debug!(bytes = %hex_dump(&reply), "reply");

    transport.send(&reply).await?;
    transport.close().await
}
