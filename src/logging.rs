//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};
use crate::error::Error;

/// Installs the global `tracing` subscriber described by `config`.
///
/// The level is `debug` when `APP_DEBUG=on`, `info` otherwise; `RUST_LOG`
/// takes precedence when set. Fails if a subscriber is already installed.
pub fn init(config: &Config) -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match config.log_format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| Error::Logging(e.to_string()))
}

fn default_directive(config: &Config) -> &'static str {
    if config.debug { "debug" } else { "info" }
}
