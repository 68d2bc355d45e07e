//! Fire Incident Alert System
//!
//! Camera registry, simulated fire detection and the owner-side dispatch
//! countdown, plus the fire-station incident board.

pub mod alerting;
pub mod config;
pub mod errors;
pub mod registry;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use errors::{Error, Result};

use config::LoggingConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default filter
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "firewatch=info".into()),
        )
        .try_init()
        .map_err(|e| Error::internal(format!("Logging already initialized: {e}")))?;

    tracing::info!("🔥 Fire alert system v{} initialized", VERSION);
    Ok(())
}

/// Initialize logging from configuration
pub fn init_with(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_new(format!("firewatch={}", logging.level))
        .map_err(|e| Error::config(format!("Invalid LOG_LEVEL {}: {e}", logging.level)))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match logging.format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        _ => builder.compact().try_init(),
    };
    installed.map_err(|e| Error::internal(format!("Logging already initialized: {e}")))?;

    tracing::info!(
        "🔥 Fire alert system v{} initialized (format={})",
        VERSION,
        logging.format
    );
    Ok(())
}
