use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for loading scene configuration
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A value that is not one of the animation mode names
    #[error("unknown animation mode '{0}'")]
    UnknownMode(String),
}

/// Result type using the crate error
pub type Result<T> = std::result::Result<T, Error>;
