//! Command-line driver for the XDR round trip.
//!
//! ```sh
//! xdr-roundtrip serve --addr 127.0.0.1:9123
//! xdr-roundtrip check --addr 127.0.0.1:9123
//! ```

use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use xdr_roundtrip::{run_roundtrip, EchoServer, HarnessConfig, ScalarRecord};

#[derive(Parser, Debug)]
#[command(name = "xdr-roundtrip", version, about = "XDR codec round-trip harness")]
struct Cli {
    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the echo peer.
    Serve(ConnArgs),
    /// Send the sample record and verify the echoed reply.
    Check(ConnArgs),
}

#[derive(Args, Debug)]
struct ConnArgs {
    /// Address to bind or connect to.
    #[arg(long)]
    addr: Option<String>,

    /// Bytes per buffer (at least the 32-byte record).
    #[arg(long)]
    buffer_size: Option<usize>,

    /// I/O timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl ConnArgs {
    /// Environment settings with the flags applied on top.
    fn into_config(self) -> xdr_roundtrip::Result<HarnessConfig> {
        let mut config = HarnessConfig::from_env()?;
        if let Some(addr) = self.addr {
            config.addr = addr;
        }
        if let Some(size) = self.buffer_size {
            config.buffer_size = size;
        }
        if let Some(ms) = self.timeout_ms {
            config.io_timeout = Duration::from_millis(ms);
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> tracing::level_filters::LevelFilter {
        match self {
            LogLevel::Error => tracing::level_filters::LevelFilter::ERROR,
            LogLevel::Warn => tracing::level_filters::LevelFilter::WARN,
            LogLevel::Info => tracing::level_filters::LevelFilter::INFO,
            LogLevel::Debug => tracing::level_filters::LevelFilter::DEBUG,
            LogLevel::Trace => tracing::level_filters::LevelFilter::TRACE,
        }
    }
}

fn init_logging(format: LogFormat, level: LogLevel) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level.as_filter())
        .with_ansi(false)
        .with_target(false);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}

const EXIT_MISMATCH: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match run(cli.command).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn run(command: Command) -> xdr_roundtrip::Result<ExitCode> {
    match command {
        Command::Serve(args) => {
            let server = EchoServer::bind(args.into_config()?).await?;
            server.run().await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check(args) => {
            let config = args.into_config()?;
            let report = run_roundtrip(&config, &ScalarRecord::sample()).await?;
            if report.is_match() {
                println!("all fields match");
                Ok(ExitCode::SUCCESS)
            } else {
                for mismatch in &report.mismatches {
                    println!("{mismatch}");
                }
                Ok(ExitCode::from(EXIT_MISMATCH))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_check_subcommand() {
        let cli = Cli::try_parse_from([
            "xdr-roundtrip",
            "check",
            "--addr",
            "127.0.0.1:7000",
            "--buffer-size",
            "36",
        ])
        .expect("check args should parse");

        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        let config = args.into_config().unwrap();
        assert_eq!(config.addr, "127.0.0.1:7000");
        assert_eq!(config.buffer_size, 36);
    }

    #[test]
    fn test_rejects_undersized_buffer() {
        let cli = Cli::try_parse_from(["xdr-roundtrip", "serve", "--buffer-size", "8"])
            .expect("serve args should parse");
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert!(args.into_config().is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let err = Cli::try_parse_from(["xdr-roundtrip", "--log-level", "loud", "check"])
            .expect_err("bad level should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
