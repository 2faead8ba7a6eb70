use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid page size: {0} (must be greater than zero)")]
    InvalidPageSize(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Logger initialisation failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FinderError>;
