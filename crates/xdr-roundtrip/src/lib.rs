//! XDR round-trip harness.
//!
//! Encodes a [`ScalarRecord`] with `xdr-codec`, sends it to an echo peer over
//! TCP, decodes the reply and compares it field by field.
//!
//! # Example
//!
//! ```ignore
//! use xdr_roundtrip::{run_roundtrip, HarnessConfig, ScalarRecord};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HarnessConfig::from_env()?;
//!     let report = run_roundtrip(&config, &ScalarRecord::sample()).await?;
//!
//!     for mismatch in &report.mismatches {
//!         println!("{}", mismatch);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod record;
mod server;
pub mod transport;

pub use client::{exchange, run_roundtrip, RoundTripReport};
pub use config::{HarnessConfig, DEFAULT_ADDR, DEFAULT_IO_TIMEOUT};
pub use error::{Error, Result};
pub use record::{hex_dump, FieldMismatch, ScalarRecord};
pub use server::{echo, EchoServer};
