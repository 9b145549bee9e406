//! Client side of the round trip.

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::record::{hex_dump, FieldMismatch, ScalarRecord};
use crate::transport::{TcpTransport, Transport};

/// Outcome of one round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTripReport {
    pub sent: ScalarRecord,
    pub received: ScalarRecord,
    pub mismatches: Vec<FieldMismatch>,
}

impl RoundTripReport {
    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Encode `record`, exchange it with the echo peer at `config.addr`, and
/// compare the decoded reply against the original.
///
/// Codec errors abort the round trip before anything is sent or compared.
pub async fn run_roundtrip(config: &HarnessConfig, record: &ScalarRecord) -> Result<RoundTripReport> {
    config.validate()?;
    let mut transport = TcpTransport::connect(&config.addr, config.io_timeout).await?;
    let report = exchange(&mut transport, config.buffer_size, record).await;
    if let Err(e) = transport.close().await {
        tracing::debug!(error = %e, "close failed");
    }
    report
}

/// One request/reply exchange over an established transport.
pub async fn exchange<T: Transport>(
    transport: &mut T,
    buffer_size: usize,
    record: &ScalarRecord,
) -> Result<RoundTripReport> {
    let mut message = vec![0u8; buffer_size];
    record.encode_into(&mut message)?;
    tracing::debug!(bytes = %hex_dump(&message), "sending");
    transport.send(&message).await?;

    // The same buffer size carries the reply; a fresh decode cursor reads it.
    let reply = transport.recv_exact(buffer_size).await?;
    tracing::debug!(bytes = %hex_dump(&reply), "received");
    let received = ScalarRecord::decode_from(&reply)?;

    let mismatches = record.diff(&received);
    for mismatch in &mismatches {
        tracing::warn!("{}", mismatch);
    }

    Ok(RoundTripReport {
        sent: *record,
        received,
        mismatches,
    })
}
