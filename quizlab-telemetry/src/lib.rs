//! # quizlab-telemetry
//!
//! Process-wide `tracing` subscriber setup for QuizLab binaries.
//!
//! Logs go to stderr so that stdout stays reserved for quiz output. The
//! `RUST_LOG` environment variable overrides the default filter; an unparsable
//! value falls back to the default rather than failing startup.
//!
//! ```rust,ignore
//! quizlab_telemetry::init_telemetry("quizlab")?;
//! tracing::info!("ready");
//! ```

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Neither `RUST_LOG` nor the fallback directive produced a filter.
    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    /// A global subscriber was already installed.
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected 'pretty' or 'json')")),
        }
    }
}

/// Default filter directive for a service: its own crates at `info`, everything else at `warn`.
pub fn default_directive(service_name: &str) -> String {
    let target = service_name.replace('-', "_");
    format!("warn,{target}=info,quizlab_rag=info,quizlab_gen=info")
}

/// Build the filter from `RUST_LOG`, falling back to `fallback`.
pub fn build_filter(fallback: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback)).map_err(|e| {
        TelemetryError::InvalidFilter { filter: fallback.to_string(), message: e.to_string() }
    })
}

/// Install a pretty stderr subscriber with the default filter for `service_name`.
pub fn init_telemetry(service_name: &str) -> Result<(), TelemetryError> {
    init_with_filter(&default_directive(service_name), LogFormat::Pretty)
}

/// Install a stderr subscriber using `fallback` when `RUST_LOG` is unset or invalid.
pub fn init_with_filter(fallback: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let filter = build_filter(fallback)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr).with_current_span(false))
            .try_init(),
    };

    result.map_err(|e| TelemetryError::Install(e.to_string()))
}
