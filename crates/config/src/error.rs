//! Error types for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read configuration file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("Error while parsing configuration '{path}': {message}.")]
    Parse { path: PathBuf, message: String },

    /// Unknown section.
    #[error("Invalid configuration section \"{section}\".")]
    InvalidSection { section: String },

    /// Entry that is not allowed in its section.
    #[error("Invalid configuration entry \"{entry}\" in section \"{section}\".")]
    InvalidEntry { section: String, entry: String },

    /// Entry with a value outside of its domain.
    #[error("Invalid configuration value detected for entry \"{entry}\": {value}. Valid values would be: {expected}.")]
    InvalidValue {
        entry: String,
        value: String,
        expected: String,
    },
}

impl ConfigError {
    /// Whether the file does not exist, in which case defaults apply.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConfigError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
