use crate::atomic::{self, Document};
use crate::bootstrap::BootstrapPointer;
use crate::dirs::DirectoryMemory;
use crate::paths;
use parking_lot::RwLock;
use peercheck_core::{CoreError, PrefsBackend};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The relocatable preference document at `<base_dir>/user_prefs.json`.
///
/// Nothing is cached: every read goes to disk and every write is a full
/// load-merge-save, so edits made to the file between calls are honored.
pub struct PreferenceStore {
    bootstrap: BootstrapPointer,
    base_dir: RwLock<PathBuf>,
}

impl PreferenceStore {
    pub fn open(bootstrap: BootstrapPointer, default_base_dir: &Path) -> Self {
        let base_dir = bootstrap.get(default_base_dir);
        Self {
            bootstrap,
            base_dir: RwLock::new(base_dir),
        }
    }

    pub fn open_default() -> Self {
        Self::open(BootstrapPointer::at_default(), &paths::default_base_dir())
    }

    pub fn base_dir(&self) -> PathBuf {
        self.base_dir.read().clone()
    }

    pub fn file_path(&self) -> PathBuf {
        self.base_dir.read().join(paths::PREFS_FILE_NAME)
    }

    /// Points the store at `dir`. The old document is left where it was and
    /// nothing is copied; a fresh document appears at `dir` on first write.
    /// A relative `dir` is resolved against the current directory.
    pub fn set_base_dir(&self, dir: &Path) -> Result<(), CoreError> {
        let dir = validate_base_dir(dir)?;
        self.bootstrap.set(&dir)?;
        let previous = std::mem::replace(&mut *self.base_dir.write(), dir.clone());
        info!(from = %previous.display(), to = %dir.display(), "preference store relocated");
        Ok(())
    }

    pub fn document(&self) -> Document {
        atomic::load(&self.file_path())
    }

    pub fn update<F>(&self, f: F) -> Result<Document, CoreError>
    where
        F: FnOnce(&mut Document),
    {
        atomic::update(&self.file_path(), f)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get_pref(key) {
            Some(v) => serde_json::from_value(v).unwrap_or_else(|e| {
                warn!(key, error = %e, "preference has unexpected type; using default");
                default
            }),
            None => default,
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let value = serde_json::to_value(value)?;
        self.set_pref(key, value)
    }

    pub fn dirs(&self) -> DirectoryMemory<'_> {
        DirectoryMemory::new(self)
    }

    pub fn get_last_dir(&self, category: &str, default: &Path) -> PathBuf {
        self.dirs().get_last_dir(category, default)
    }

    pub fn update_last_dir(&self, category: &str, dir: &Path) -> Result<(), CoreError> {
        self.dirs().update_last_dir(category, dir)
    }
}

impl PrefsBackend for PreferenceStore {
    fn get_pref(&self, key: &str) -> Option<Value> {
        self.document().remove(key)
    }

    fn set_prefs(&self, entries: &[(&str, Value)]) -> Result<(), CoreError> {
        self.update(|doc| {
            for (k, v) in entries {
                doc.insert((*k).to_string(), v.clone());
            }
        })?;
        Ok(())
    }
}

/// Returns the absolute form of `dir` once it is usable as a base dir.
fn validate_base_dir(dir: &Path) -> Result<PathBuf, CoreError> {
    let invalid = |reason| CoreError::InvalidBaseDir {
        path: dir.to_path_buf(),
        reason,
    };
    if dir.as_os_str().is_empty() {
        return Err(invalid("empty path"));
    }
    let dir = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|_| invalid("cannot resolve relative path"))?
            .join(dir)
    };
    // the pointer stores the path as a JSON string
    if dir.to_str().is_none() {
        return Err(invalid("path is not valid UTF-8"));
    }
    if !dir.exists() {
        return Err(invalid("does not exist"));
    }
    if !dir.is_dir() {
        return Err(invalid("not a directory"));
    }
    tempfile::tempfile_in(&dir).map_err(|_| invalid("not writable"))?;
    Ok(dir)
}
