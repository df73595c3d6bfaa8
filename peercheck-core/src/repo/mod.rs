use crate::CoreError;
use serde_json::Value;

pub mod memory;

pub use memory::MemoryPrefs;

/// Flat key/value access to a preference document.
///
/// Every write is a single load-merge-save: keys not named in `entries`
/// are left as they were.
pub trait PrefsBackend {
    fn get_pref(&self, key: &str) -> Option<Value>;
    fn set_prefs(&self, entries: &[(&str, Value)]) -> Result<(), CoreError>;

    fn set_pref(&self, key: &str, value: Value) -> Result<(), CoreError> {
        self.set_prefs(&[(key, value)])
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get_pref(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    fn get_count(&self, key: &str) -> u64 {
        self.get_pref(key).and_then(|v| v.as_u64()).unwrap_or(0)
    }
}

impl<B: PrefsBackend + ?Sized> PrefsBackend for &B {
    fn get_pref(&self, key: &str) -> Option<Value> {
        (**self).get_pref(key)
    }

    fn set_prefs(&self, entries: &[(&str, Value)]) -> Result<(), CoreError> {
        (**self).set_prefs(entries)
    }
}
