use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode preferences: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid base directory {}: {reason}", path.display())]
    InvalidBaseDir { path: PathBuf, reason: &'static str },
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
    #[error("unknown settings key: {0}")]
    UnknownSetting(String),
    #[error("invalid value for setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
    #[error("check failed: {0}")]
    Check(String),
}

impl CoreError {
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Storage {
            path: path.into(),
            source,
        }
    }
}
