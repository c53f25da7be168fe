//! Loading [`ClusterConfig`] from TOML files.

use std::path::{Path, PathBuf};

use crime_risk_hotspot_models::ClusterConfig;
use thiserror::Error;

use crate::{HotspotError, validate_config};

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for a cluster configuration.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parsed but are out of range.
    #[error(transparent)]
    Invalid(#[from] HotspotError),
}

/// Parses and validates a cluster configuration from TOML text. Keys that
/// are absent keep their defaults.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed TOML and
/// [`ConfigError::Invalid`] for out-of-range values.
pub fn parse_config(toml_str: &str) -> Result<ClusterConfig, ConfigError> {
    let config: ClusterConfig = toml::from_str(toml_str)?;
    validate_config(&config)?;
    Ok(config)
}

/// Reads a cluster configuration from a TOML file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read, otherwise see
/// [`parse_config`].
pub fn load_config(path: &Path) -> Result<ClusterConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents)?;
    log::info!("Loaded cluster config from {}", path.display());
    Ok(config)
}
