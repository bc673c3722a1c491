//! Configuration loading.
//!
//! The engine runs fine without a config file; [`load_config_or_default`]
//! falls back to [`NavigationConfig::default`] and only logs what went wrong.

use std::fs;
use std::path::Path;

use navstate_model::{ConfigError, NavigationConfig};

/// Load a config file, failing on I/O or parse errors.
pub fn load_config(path: &Path) -> Result<NavigationConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file if one is given, using defaults on any failure.
pub fn load_config_or_default(path: Option<&Path>) -> NavigationConfig {
    let Some(path) = path else {
        return NavigationConfig::default();
    };

    match load_config(path) {
        Ok(config) => {
            tracing::info!("Loaded navigation config from {:?}", path);
            config
        }
        Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No config file found at {:?}, using defaults", path);
            NavigationConfig::default()
        }
        Err(e) => {
            tracing::warn!("{}, using defaults", e);
            NavigationConfig::default()
        }
    }
}

pub fn config_to_toml(config: &NavigationConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}

/// The default configuration rendered as TOML.
pub fn default_config_toml() -> Result<String, toml::ser::Error> {
    config_to_toml(&NavigationConfig::default())
}
