//! Structured logging setup.
//!
//! Installs a global `tracing` subscriber from a [`LoggingConfig`]. Console and
//! file output are separate layers, each enabled by its own flag. `RUST_LOG`
//! overrides the configured level when set. Only the first successful call
//! installs a subscriber; later calls are no-ops.

use crate::config::LoggingConfig;
use crate::error::{ParcelError, Result};
use std::fs::OpenOptions;
use std::sync::{Mutex, OnceLock};
use tracing::Subscriber;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INITIALIZED: OnceLock<()> = OnceLock::new();

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_lowercase()))
}

fn fmt_layer<S, W>(writer: W, json: bool, ansi: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

/// Build the subscriber described by `config` without installing it
///
/// # Errors
/// Returns `ParcelError::ConfigError` if no output is enabled, file output is
/// enabled without a path, or the log file cannot be opened
pub fn subscriber(config: &LoggingConfig) -> Result<impl Subscriber + Send + Sync + 'static> {
    if !config.log_to_console && !config.log_to_file {
        return Err(ParcelError::ConfigError(
            "At least one logging output (console or file) must be enabled".to_string(),
        ));
    }

    let mut layers = Vec::new();

    if config.log_to_console {
        layers.push(fmt_layer(std::io::stdout, config.json_format, true));
    }

    if config.log_to_file {
        let path = config.log_file_path.as_deref().ok_or_else(|| {
            ParcelError::ConfigError(
                "log_file_path must be specified when log_to_file is true".to_string(),
            )
        })?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ParcelError::ConfigError(format!("Failed to open log file: {e}")))?;
        layers.push(fmt_layer(Mutex::new(file), config.json_format, false));
    }

    Ok(tracing_subscriber::registry()
        .with(env_filter(config))
        .with(layers))
}

/// Install the global subscriber described by `config`
///
/// # Errors
/// Returns `ParcelError::ConfigError` if the subscriber cannot be built or
/// another global subscriber is already installed
pub fn init(config: &LoggingConfig) -> Result<()> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    subscriber(config)?
        .try_init()
        .map_err(|e| ParcelError::ConfigError(format!("Failed to install subscriber: {e}")))?;
    let _ = INITIALIZED.set(());
    tracing::info!(app = %config.app_name, "Logging initialized");
    Ok(())
}
