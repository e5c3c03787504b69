use thiserror::Error;
use wayworn_core::TrailConfig;

use crate::validator::validate_config;

/// File name the host stores the configuration under.
pub const CONFIG_FILE_NAME: &str = "WaywornConfig.ron";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse config RON: {0}")]
    ConfigParseError(String),
    #[error("Failed to serialize config RON: {0}")]
    ConfigWriteError(String),
}

/// Outcome of loading the configuration: the config in effect, what was wrong
/// with the input, and the text to write back to the config file.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: TrailConfig,
    pub warnings: Vec<String>,
    /// RON text of `config`, to persist so the file always lists every setting.
    /// `None` only if serialization failed.
    pub stored: Option<String>,
}

/// Parse a configuration RON string. Missing fields take their defaults.
pub fn load_config_from_str(ron_str: &str) -> Result<TrailConfig, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::ConfigParseError(e.to_string()))
}

/// Serialize a configuration as pretty RON.
pub fn store_config(config: &TrailConfig) -> Result<String, LoadError> {
    let pretty = ron::ser::PrettyConfig::new().depth_limit(2);
    ron::ser::to_string_pretty(config, pretty).map_err(|e| LoadError::ConfigWriteError(e.to_string()))
}

/// Load the configuration from an optional file body.
///
/// A missing or unparsable file yields the defaults; invalid individual values
/// are reset to their defaults. Never fails.
pub fn load_config(source: Option<&str>) -> ConfigLoad {
    let mut warnings = Vec::new();

    let mut config = match source {
        Some(text) => match load_config_from_str(text) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{CONFIG_FILE_NAME} is invalid, will generate a new one: {e}");
                warnings.push(e.to_string());
                TrailConfig::default()
            }
        },
        None => {
            log::info!("{CONFIG_FILE_NAME} not found, using defaults");
            TrailConfig::default()
        }
    };

    for err in validate_config(&mut config) {
        log::warn!("{CONFIG_FILE_NAME}: {err}; using default");
        warnings.push(err.to_string());
    }

    let stored = match store_config(&config) {
        Ok(text) => Some(text),
        Err(e) => {
            log::error!("{e}");
            None
        }
    };

    ConfigLoad {
        config,
        warnings,
        stored,
    }
}
