use std::{env, io};

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "ITINERARY_LOG";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid logging filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to install logging subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install a stderr subscriber for the command-line tool. The library itself never calls this.
pub fn init_logging() -> Result<(), LoggingError> {
    let filter = build_filter()?;
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

fn build_filter() -> Result<EnvFilter, ParseError> {
    if let Ok(directives) = env::var(LOG_ENV) {
        if !directives.trim().is_empty() {
            return EnvFilter::try_new(directives);
        }
    }

    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new("warn"),
    }
}
