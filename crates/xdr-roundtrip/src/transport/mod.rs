//! Byte-duplex transport for the round trip.
//!
//! The codec never sees the transport: a buffer is handed over only once it
//! has been received in full.

mod tcp;

pub use tcp::TcpTransport;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};

use crate::error::{Error, Result};

/// Trait for transport implementations.
#[async_trait]
pub trait Transport: Send {
    /// Send the whole buffer.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive exactly `len` bytes.
    async fn recv_exact(&mut self, len: usize) -> Result<Bytes>;

    /// Close the transport.
    async fn close(&mut self) -> Result<()>;
}

/// Read until `len` bytes have arrived.
///
/// A clean end-of-stream before then is reported as
/// [`Error::ConnectionClosed`] with the count received so far.
async fn read_exact<R: tokio::io::AsyncRead + Unpin>(
    reader: &mut R,
    buf: &mut BytesMut,
    len: usize,
) -> Result<Bytes> {
    use tokio::io::AsyncReadExt;

    buf.clear();
    buf.reserve(len);
    while buf.len() < len {
        let mut chunk = (&mut *reader).take((len - buf.len()) as u64);
        if chunk.read_buf(buf).await? == 0 {
            return Err(Error::ConnectionClosed {
                received: buf.len(),
                expected: len,
            });
        }
    }

    Ok(buf.split().freeze())
}

/// Write the whole buffer and flush.
async fn write_all<W: tokio::io::AsyncWrite + Unpin>(writer: &mut W, data: &[u8]) -> Result<()> {
    use tokio::io::AsyncWriteExt;

    writer.write_all(data).await?;
    writer.flush().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_read_exact_across_writes() {
        let (mut client, mut server) = tokio::io::duplex(64);
        tokio::spawn(async move {
            client.write_all(&[1, 2, 3]).await.unwrap();
            client.write_all(&[4, 5, 6, 7, 8]).await.unwrap();
        });

        let mut buf = BytesMut::new();
        let data = read_exact(&mut server, &mut buf, 6).await.unwrap();
        assert_eq!(&data[..], &[1, 2, 3, 4, 5, 6]);
        let rest = read_exact(&mut server, &mut buf, 2).await.unwrap();
        assert_eq!(&rest[..], &[7, 8]);
    }

    #[tokio::test]
    async fn test_read_exact_reports_short_stream() {
        let (mut client, mut server) = tokio::io::duplex(64);
        write_all(&mut client, &[9; 5]).await.unwrap();
        drop(client);

        let mut buf = BytesMut::new();
        let err = read_exact(&mut server, &mut buf, 8).await.unwrap_err();
        assert!(matches!(
            err,
            Error::ConnectionClosed { received: 5, expected: 8 }
        ));
    }
}
