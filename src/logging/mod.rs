//! Logging initialization with environment-based formatters
//!
//! - Production: structured JSON logs
//! - Everything else: colourful, human-readable logs
//!
//! `LOG_FORMAT=json|pretty` overrides the environment choice.

use crate::config::get_environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Pick a format from the environment name and an optional explicit override
    pub fn resolve(environment: &str, override_format: Option<&str>) -> Self {
        match override_format.map(|f| f.trim().to_ascii_lowercase()) {
            Some(f) if f == "json" => LogFormat::Json,
            Some(f) if f == "pretty" || f == "text" => LogFormat::Pretty,
            _ if matches!(environment, "production" | "prod") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber. Filter comes from `RUST_LOG`, default `info`.
pub fn init_logging() {
    let format = LogFormat::resolve(
        &get_environment(),
        std::env::var("LOG_FORMAT").ok().as_deref(),
    );
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
    };

    // A subscriber may already be installed when embedded in tests.
    if let Err(e) = result {
        eprintln!("logging already initialized: {}", e);
    }
}
