//! Logging setup for binaries embedding hotsift.
//!
//! The library itself only emits `tracing` events. `HOTSIFT_LOG` (same
//! syntax as `RUST_LOG`) wins over the configured level.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Environment variable overriding the configured level
pub const LOG_ENV: &str = "HOTSIFT_LOG";

/// Filter from `HOTSIFT_LOG`, else from the config level
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global fmt subscriber. Returns false if one was already set.
pub fn init(config: &LogConfig) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(false)
        .try_init()
        .is_ok()
}
