//! # rmf-telemetry
//!
//! Structured logging for the RMF assistant binaries.
//!
//! Log levels come from `RUST_LOG` (default `info`). The output format is
//! human-readable unless `RMF_LOG_FORMAT=json` is set.
//!
//! ```rust,ignore
//! rmf_telemetry::init_from_env("rmf-cli")?;
//! tracing::info!(persona = "AUDIT_SPECIALIST", "routed question");
//! ```

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "RMF_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("telemetry already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("unknown log format '{0}', expected 'pretty' or 'json'")]
    UnknownFormat(String),
}

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(TelemetryError::UnknownFormat(other.to_string())),
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a human-readable subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError::AlreadyInitialized`] if a global subscriber exists.
pub fn init_telemetry(service: &str) -> Result<(), TelemetryError> {
    init(service, LogFormat::Pretty)
}

/// Install a JSON subscriber, one object per event.
///
/// # Errors
///
/// Returns [`TelemetryError::AlreadyInitialized`] if a global subscriber exists.
pub fn init_json_telemetry(service: &str) -> Result<(), TelemetryError> {
    init(service, LogFormat::Json)
}

/// Install a subscriber in the format named by `RMF_LOG_FORMAT`.
pub fn init_from_env(service: &str) -> Result<(), TelemetryError> {
    let format = match std::env::var(LOG_FORMAT_ENV) {
        Ok(value) => value.parse()?,
        Err(_) => LogFormat::default(),
    };
    init(service, format)
}

/// Install a subscriber with an explicit format.
pub fn init(service: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let registry = tracing_subscriber::registry().with(env_filter());
    let result = match format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).with_span_list(false))
            .try_init(),
    };
    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(service, ?format, "telemetry initialized");
    Ok(())
}
