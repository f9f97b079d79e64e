use thiserror::Error;

use crate::config::guard::MissingValues;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("could not read config file '{path}': {source}")]
    Read { path: String, source: std::io::Error },

    /// Config file is not valid YAML for `ZephyrConfig`
    #[error("could not parse config file '{path}': {source}")]
    Parse { path: String, source: serde_yaml::Error },

    /// An environment variable held a value of the wrong shape
    #[error("environment variable {name} is invalid: {reason}")]
    InvalidEnv { name: &'static str, reason: String },

    /// The configured trace file could not be opened for appending
    #[error("could not open trace file '{path}': {source}")]
    TraceFile { path: String, source: std::io::Error },

    /// Mandatory settings were absent
    #[error(transparent)]
    Missing(#[from] MissingValues),
}
