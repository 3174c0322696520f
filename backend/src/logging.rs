use crate::config::LoggingConfig;
use anyhow::{anyhow, Result};

/// Install the global tracing subscriber. Records emitted through the `log`
/// macros are forwarded to it as well.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
