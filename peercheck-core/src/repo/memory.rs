use crate::{repo::PrefsBackend, CoreError};
use parking_lot::RwLock;
use serde_json::{Map, Value};

/// Preference backend held entirely in memory. Used where no file is wanted.
#[derive(Default)]
pub struct MemoryPrefs {
    doc: RwLock<Map<String, Value>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(doc: Map<String, Value>) -> Self {
        Self {
            doc: RwLock::new(doc),
        }
    }

    pub fn document(&self) -> Map<String, Value> {
        self.doc.read().clone()
    }
}

impl PrefsBackend for MemoryPrefs {
    fn get_pref(&self, key: &str) -> Option<Value> {
        self.doc.read().get(key).cloned()
    }

    fn set_prefs(&self, entries: &[(&str, Value)]) -> Result<(), CoreError> {
        let mut doc = self.doc.write();
        for (k, v) in entries {
            doc.insert((*k).to_string(), v.clone());
        }
        Ok(())
    }
}
