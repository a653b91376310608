//! Logging setup for the binary. Logs go to stderr; stdout carries only JSON.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum TelemetryError {
  #[error("invalid log filter '{value}'")]
  Filter {
    value: String,
    #[source]
    source: ParseError,
  },

  #[error("logger already installed: {0}")]
  Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Build the filter: RUST_LOG first, then the given fallback level.
pub fn filter(fallback: &str) -> Result<EnvFilter, TelemetryError> {
  match EnvFilter::try_from_default_env() {
    Ok(filter) => Ok(filter),
    Err(_) => EnvFilter::try_new(fallback).map_err(|source| TelemetryError::Filter {
      value: fallback.to_string(),
      source,
    }),
  }
}

pub fn init(fallback_level: &str) -> Result<(), TelemetryError> {
  tracing_subscriber::fmt()
    .with_env_filter(filter(fallback_level)?)
    .with_writer(std::io::stderr)
    .with_target(false)
    .compact()
    .with_ansi(false)
    .try_init()
    .map_err(TelemetryError::Install)
}
