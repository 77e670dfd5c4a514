use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OutlineError>;

/// Failures at the edges of the crate: loading config, reading files,
/// fetching pages. The outline engine itself never fails.
#[derive(Error, Debug)]
pub enum OutlineError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),
}
