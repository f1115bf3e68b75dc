//! Configuration for the Tessera terrain streamer.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, StreamingConfig, TerrainConfig, WaterConfig};
pub use error::ConfigError;

/// Default configuration directory: `<platform config dir>/tessera`.
///
/// Returns `None` when the platform has no config directory.
pub fn default_config_dir() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tessera"))
}
