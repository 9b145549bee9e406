//! Harness configuration.
//!
//! Defaults can be overridden from the environment with
//! [`HarnessConfig::from_env`], and the binary applies its flags on top.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::record::ScalarRecord;

/// Default address of the echo peer.
pub const DEFAULT_ADDR: &str = "127.0.0.1:9123";

/// Default timeout for connect, send and receive.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

pub const ENV_ADDR: &str = "XDR_ROUNDTRIP_ADDR";
pub const ENV_BUFFER_SIZE: &str = "XDR_ROUNDTRIP_BUFFER_SIZE";
pub const ENV_TIMEOUT_MS: &str = "XDR_ROUNDTRIP_TIMEOUT_MS";

/// Settings shared by the client and the echo server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// `host:port` to connect to or bind.
    pub addr: String,
    /// Bytes exchanged per leg. At least [`ScalarRecord::WIRE_SIZE`]; anything
    /// beyond the record is slack and left zeroed.
    pub buffer_size: usize,
    pub io_timeout: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            buffer_size: ScalarRecord::WIRE_SIZE,
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }
}

impl HarnessConfig {
    /// Defaults overlaid with any `XDR_ROUNDTRIP_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(addr) = lookup(ENV_ADDR) {
            config.addr = addr;
        }
        if let Some(size) = lookup(ENV_BUFFER_SIZE) {
            config.buffer_size = parse_number(ENV_BUFFER_SIZE, &size)?;
        }
        if let Some(ms) = lookup(ENV_TIMEOUT_MS) {
            config.io_timeout = Duration::from_millis(parse_number(ENV_TIMEOUT_MS, &ms)?);
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that a record fits in the buffer and the address is usable.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size < ScalarRecord::WIRE_SIZE {
            return Err(Error::Config(format!(
                "buffer size {} is smaller than the {}-byte record",
                self.buffer_size,
                ScalarRecord::WIRE_SIZE
            )));
        }
        if self.addr.is_empty() {
            return Err(Error::Config("address must not be empty".to_string()));
        }
        if self.io_timeout.is_zero() {
            return Err(Error::Config("I/O timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{}: invalid number {:?}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.addr, "127.0.0.1:9123");
        assert_eq!(config.buffer_size, 32);
    }

    #[test]
    fn test_env_overrides() {
        let config = HarnessConfig::from_lookup(lookup(&[
            (ENV_ADDR, "10.0.0.1:7000"),
            (ENV_BUFFER_SIZE, "36"),
            (ENV_TIMEOUT_MS, "250"),
        ]))
        .unwrap();
        assert_eq!(config.addr, "10.0.0.1:7000");
        assert_eq!(config.buffer_size, 36);
        assert_eq!(config.io_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_rejects_small_buffer() {
        let err = HarnessConfig::from_lookup(lookup(&[(ENV_BUFFER_SIZE, "16")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = HarnessConfig::from_lookup(lookup(&[(ENV_TIMEOUT_MS, "soon")])).unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT_MS));
    }
}
