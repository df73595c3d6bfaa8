use crate::{atomic, paths};
use peercheck_core::CoreError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

const KEY_BASE_DIR: &str = "base_dir";

/// Fixed-location record of where the relocatable preference store lives.
#[derive(Clone, Debug)]
pub struct BootstrapPointer {
    path: PathBuf,
}

impl BootstrapPointer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn at_default() -> Self {
        Self::new(paths::default_bootstrap_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, fallback: &Path) -> PathBuf {
        atomic::load(&self.path)
            .get(KEY_BASE_DIR)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| fallback.to_path_buf())
    }

    pub fn set(&self, base_dir: &Path) -> Result<(), CoreError> {
        let value = base_dir
            .to_str()
            .ok_or_else(|| CoreError::NonUtf8Path(base_dir.to_path_buf()))?;
        atomic::update(&self.path, |doc| {
            doc.insert(KEY_BASE_DIR.to_string(), Value::from(value));
        })?;
        info!(base_dir = %base_dir.display(), "base directory recorded");
        Ok(())
    }
}
