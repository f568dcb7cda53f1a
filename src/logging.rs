//! Structured logging for the generator.
//!
//! Generated sources may be written to stdout (`--emit json`), so every log
//! line goes to stderr.
//!
//! | Variable              | Default  | Values                              |
//! |-----------------------|----------|-------------------------------------|
//! | `GOKITMUX_LOG`        | `info`   | `EnvFilter` directives              |
//! | `GOKITMUX_LOG_FORMAT` | `pretty` | pretty/json                         |
//! | `RUST_LOG`            |          | full `EnvFilter` directives; wins   |

use anyhow::{Context, Result};
use std::env;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: pretty for terminals, JSON for CI log collectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `info` or `gokitmux::generator=debug`
    pub log_level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    /// Read the configuration from the environment, with defaults.
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("GOKITMUX_LOG").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("GOKITMUX_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
        }
    }

    /// `RUST_LOG` if set, else `log_level`. Invalid directives fall back to `info`.
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .unwrap_or_else(|err| {
                eprintln!("Warning: Invalid log filter {:?}: {err}", self.log_level);
                EnvFilter::new("info")
            })
    }
}

/// Install the global subscriber.
///
/// Fails when a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let env_filter = config.env_filter();

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}
