use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AugmentError {
    #[error("Unknown extension: {0}")]
    UnknownExtension(String),

    #[error("Configuration not found: {0}")]
    ConfigNotFound(String),

    #[error("Invalid configuration path: {0}")]
    InvalidPath(PathBuf),

    #[error("Storage error for {name}: {message}")]
    Storage { name: String, message: String },

    #[error("Pre-save normalization failed for {0}: {1}")]
    Normalization(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, AugmentError>;
