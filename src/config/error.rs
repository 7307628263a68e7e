//! Errors raised while loading `blocksmith.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read project config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("blocksmith.toml is not valid TOML for this tool: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file parsed, but the realization table or paths are unusable.
    #[error("blocksmith.toml rejected: {0}")]
    Validation(String),
}
