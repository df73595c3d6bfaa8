use crate::store::PreferenceStore;
use peercheck_core::{CoreError, KEY_DIRS};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Last-used folder per named category, kept under `dirs` in the store.
pub struct DirectoryMemory<'a> {
    store: &'a PreferenceStore,
}

impl<'a> DirectoryMemory<'a> {
    pub fn new(store: &'a PreferenceStore) -> Self {
        Self { store }
    }

    pub fn get_last_dir(&self, category: &str, default: &Path) -> PathBuf {
        self.all()
            .remove(category)
            .unwrap_or_else(|| default.to_path_buf())
    }

    pub fn update_last_dir(&self, category: &str, dir: &Path) -> Result<(), CoreError> {
        let value = dir
            .to_str()
            .map(Value::from)
            .ok_or_else(|| CoreError::NonUtf8Path(dir.to_path_buf()))?;
        self.store.update(|doc| {
            let entry = doc
                .entry(KEY_DIRS.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(dirs) = entry {
                dirs.insert(category.to_string(), value);
            }
        })?;
        debug!(category, dir = %dir.display(), "last directory updated");
        Ok(())
    }

    pub fn all(&self) -> BTreeMap<String, PathBuf> {
        let doc = self.store.document();
        let Some(Value::Object(dirs)) = doc.get(KEY_DIRS) else {
            return BTreeMap::new();
        };
        dirs.iter()
            .filter_map(|(k, v)| {
                v.as_str()
                    .filter(|s| !s.is_empty())
                    .map(|s| (k.clone(), PathBuf::from(s)))
            })
            .collect()
    }
}
