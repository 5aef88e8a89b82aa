use crate::config::Campaign;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("{file} has no entry for campaign {campaign}")]
    MissingCampaign { file: PathBuf, campaign: Campaign },

    #[error("missing configuration key: {0}")]
    MissingKey(String),
}
