//! Tracing Setup
//!
//! Installs a `tracing-subscriber` formatter driven by [`LoggingConfig`].
//!
//! # Configuration
//!
//! - `RUST_LOG`: Overrides the configured level when set
//! - `observability.logging.format`: `json` | `pretty` | `compact`
//!
//! # Usage
//!
//! ```rust,ignore
//! use strategy_margin::telemetry::init_telemetry;
//!
//! let config = strategy_margin::config::load_config(None)?;
//! init_telemetry(&config.observability.logging);
//! ```

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_telemetry(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.include_target);

    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        _ => builder.compact().try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
        return;
    }

    tracing::info!(
        level = %config.level,
        format = %config.format,
        "Logging initialized"
    );
}
