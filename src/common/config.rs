//! Worker configuration loaded from a JSON file.
//!
//! The configuration file is shared with the front-end service, which is
//! why the keys are spelled in PascalCase. The worker only reads the
//! subset of options listed here.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Application configuration.
///
/// `total_instances` is not a config key of its own: it is derived from the
/// number of configured worker addresses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppConfig {
    /// Canvas height in cells
    pub canvas_rows: usize,
    /// Canvas width in cells
    pub canvas_cols: usize,
    /// Minimum gap between two pixel placements by the same session, in seconds
    pub cooldown_seconds: u64,

    /// Named colors making up the palette (CSS color names)
    pub palette_colors: Vec<String>,
    /// Path to the PNG tiled over the canvas at boot
    pub initial_image: String,

    /// Redis `host:port`
    pub redis_address: String,
    /// Redis password; empty means no auth
    #[serde(default)]
    pub redis_password: String,
    /// Redis database index
    #[serde(default)]
    pub redis_database: i64,

    /// One address per worker instance; the length defines the shard count
    pub web_socket_app_addresses: Vec<String>,

    /// Regular expression matched against the `Origin` header.
    /// Absent means all origins are accepted.
    #[serde(default)]
    pub allowed_origins: Option<String>,
}

impl AppConfig {
    /// Read and validate the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Number of worker instances the canvas is sharded across.
    pub fn total_instances(&self) -> usize {
        self.web_socket_app_addresses.len()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_rows == 0 {
            return Err(ConfigError::Invalid("CanvasRows must be > 0".into()));
        }
        if self.canvas_cols == 0 {
            return Err(ConfigError::Invalid("CanvasCols must be > 0".into()));
        }
        if self.palette_colors.is_empty() || self.palette_colors.len() > 256 {
            return Err(ConfigError::Invalid(
                "PaletteColors must contain between 1 and 256 colors".into(),
            ));
        }
        if self.web_socket_app_addresses.is_empty() {
            return Err(ConfigError::Invalid(
                "WebSocketAppAddresses must list at least one worker".into(),
            ));
        }
        Ok(())
    }
}
