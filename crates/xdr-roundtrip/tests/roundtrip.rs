use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use xdr_roundtrip::{run_roundtrip, EchoServer, Error, HarnessConfig, ScalarRecord};

fn local_config(buffer_size: usize) -> HarnessConfig {
    HarnessConfig {
        addr: "127.0.0.1:0".to_string(),
        buffer_size,
        io_timeout: Duration::from_secs(2),
    }
}

async fn spawn_echo(buffer_size: usize) -> HarnessConfig {
    let server = EchoServer::bind(local_config(buffer_size)).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move { server.serve_one().await });
    HarnessConfig {
        addr: addr.to_string(),
        ..local_config(buffer_size)
    }
}

/// Peer that reads `len` bytes and answers with `respond(request)`.
async fn spawn_raw_peer<F>(len: usize, respond: F) -> HarnessConfig
where
    F: FnOnce(Vec<u8>) -> Vec<u8> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = vec![0u8; len];
        stream.read_exact(&mut request).await.unwrap();
        let reply = respond(request);
        stream.write_all(&reply).await.unwrap();
        stream.shutdown().await.unwrap();
    });
    HarnessConfig {
        addr: addr.to_string(),
        ..local_config(len)
    }
}

#[tokio::test]
async fn sample_record_survives_echo() {
    let config = spawn_echo(ScalarRecord::WIRE_SIZE).await;
    let report = run_roundtrip(&config, &ScalarRecord::sample()).await.unwrap();

    assert!(report.is_match(), "{:?}", report.mismatches);
    assert_eq!(report.received, ScalarRecord::sample());
}

#[tokio::test]
async fn slack_bytes_in_legacy_buffer_size() {
    let config = spawn_echo(36).await;
    let report = run_roundtrip(&config, &ScalarRecord::sample()).await.unwrap();
    assert!(report.is_match());
}

#[tokio::test]
async fn extreme_values_survive_echo() {
    let record = ScalarRecord {
        u8: u8::MAX,
        i8: i8::MIN,
        u16: u16::MAX,
        i16: i16::MIN,
        u32: u32::MAX,
        i32: i32::MIN,
        f32: f32::NEG_INFINITY,
        f64: f64::MIN_POSITIVE,
    };
    let config = spawn_echo(ScalarRecord::WIRE_SIZE).await;
    let report = run_roundtrip(&config, &record).await.unwrap();
    assert_eq!(report.received, record);
}

#[tokio::test]
async fn byte_swapped_reply_is_reported_as_mismatch() {
    let config = spawn_raw_peer(ScalarRecord::WIRE_SIZE, |mut bytes| {
        for word in bytes.chunks_mut(4) {
            word.reverse();
        }
        bytes
    })
    .await;

    let report = run_roundtrip(&config, &ScalarRecord::sample()).await.unwrap();
    assert!(!report.is_match());
    assert!(report.mismatches.iter().any(|m| m.field == "u32"));
    assert!(report.mismatches.iter().all(|m| m.field != "i8"));
}

#[tokio::test]
async fn truncated_reply_is_connection_closed() {
    let config = spawn_raw_peer(ScalarRecord::WIRE_SIZE, |bytes| bytes[..20].to_vec()).await;

    let err = run_roundtrip(&config, &ScalarRecord::sample()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::ConnectionClosed { received: 20, expected: 32 }
    ));
    assert!(!err.is_codec());
}

#[tokio::test]
async fn silent_peer_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hold = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(stream);
    });

    let config = HarnessConfig {
        addr: addr.to_string(),
        io_timeout: Duration::from_millis(200),
        ..local_config(ScalarRecord::WIRE_SIZE)
    };
    let err = run_roundtrip(&config, &ScalarRecord::sample()).await.unwrap_err();
    assert!(matches!(err, Error::Timeout));
    hold.abort();
}

#[tokio::test]
async fn undersized_buffer_is_rejected_before_connecting() {
    let config = local_config(16);
    let err = run_roundtrip(&config, &ScalarRecord::sample()).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
