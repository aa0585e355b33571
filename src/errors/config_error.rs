//! Configuration errors.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid TOML in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid value for {field}: {message}")]
    Validation { field: String, message: String },
}
