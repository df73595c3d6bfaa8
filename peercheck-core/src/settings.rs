//! User-configurable toggles and their snapshot under `settings` in the
//! preference document.
//!
//! Only names on an allow-list ever cross between the document and
//! [`AppSettings`]; anything else found in the document is skipped.

use crate::{CoreError, PrefsBackend, KEY_SETTINGS};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const SETTINGS_ALLOW_LIST: &[&str] = &[
    "log_detail",
    "write_log_file",
    "log_include_walk_path",
    "log_color_mode",
    "show_all_sheets",
    "output_xlsx",
    "log_show_abbrev_header",
    "log_abbrev_header_lines",
    "log_nap_tiepoints",
    "log_svcloc_debug",
    "log_drop_debug",
    "log_drop_summary_block",
    "log_mirror_sheets",
    "log_slack_loop_debug",
    "log_slack_loop_sheet_to_log",
    "log_nid_debug",
    "log_nid_sheet_to_log",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// "DEBUG" for verbose logs, anything else is condensed.
    pub log_detail: String,
    pub write_log_file: bool,
    pub log_include_walk_path: bool,
    /// "ANSI", "EMOJI" or "OFF". "ANSI" becomes "EMOJI" when the console
    /// is not a terminal.
    pub log_color_mode: String,
    pub show_all_sheets: bool,
    pub output_xlsx: String,
    pub log_show_abbrev_header: bool,
    pub log_abbrev_header_lines: Vec<String>,
    pub log_nap_tiepoints: bool,
    pub log_svcloc_debug: bool,
    pub log_drop_debug: bool,
    pub log_drop_summary_block: bool,
    pub log_mirror_sheets: bool,
    pub log_slack_loop_debug: bool,
    pub log_slack_loop_sheet_to_log: bool,
    pub log_nid_debug: bool,
    pub log_nid_sheet_to_log: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_detail: "INFO".to_string(),
            write_log_file: false,
            log_include_walk_path: false,
            log_color_mode: "OFF".to_string(),
            show_all_sheets: true,
            output_xlsx: "Layer_By_Person_Summary.xlsx".to_string(),
            log_show_abbrev_header: true,
            log_abbrev_header_lines: vec!["SL = Service Locations".to_string()],
            log_nap_tiepoints: true,
            log_svcloc_debug: true,
            log_drop_debug: true,
            log_drop_summary_block: true,
            log_mirror_sheets: true,
            log_slack_loop_debug: false,
            log_slack_loop_sheet_to_log: true,
            log_nid_debug: false,
            log_nid_sheet_to_log: false,
        }
    }
}

impl AppSettings {
    pub fn is_debug(&self) -> bool {
        self.log_detail.eq_ignore_ascii_case("DEBUG")
    }

    fn to_map(&self) -> Result<Map<String, Value>, CoreError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.to_map().ok()?.remove(key)
    }

    /// Sets one field by name. Unknown names and values of the wrong type
    /// are rejected and leave `self` unchanged.
    pub fn apply(&mut self, key: &str, value: Value) -> Result<(), CoreError> {
        let mut map = self.to_map()?;
        match map.get_mut(key) {
            Some(slot) => *slot = value,
            None => return Err(CoreError::UnknownSetting(key.to_string())),
        }
        *self = serde_json::from_value(Value::Object(map)).map_err(|e| CoreError::InvalidSetting {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

pub struct SettingsSnapshot;

impl SettingsSnapshot {
    /// Copies every allow-listed value of `settings` into a JSON map.
    pub fn capture(settings: &AppSettings, allow_list: &[&str]) -> Map<String, Value> {
        let mut snapshot = Map::new();
        for key in allow_list {
            match settings.get(key) {
                Some(v) => {
                    snapshot.insert((*key).to_string(), v);
                }
                None => debug!(key, "allow-listed name is not a setting"),
            }
        }
        snapshot
    }

    /// Captures `settings` and stores the snapshot under `settings` in the
    /// preference document.
    pub fn apply<B: PrefsBackend>(
        prefs: &B,
        settings: &AppSettings,
        allow_list: &[&str],
    ) -> Result<Map<String, Value>, CoreError> {
        let snapshot = Self::capture(settings, allow_list);
        prefs.set_pref(KEY_SETTINGS, Value::Object(snapshot.clone()))?;
        debug!(keys = snapshot.len(), "settings snapshot saved");
        Ok(snapshot)
    }

    pub fn restore<B: PrefsBackend>(
        prefs: &B,
        allow_list: &[&str],
        target: &mut AppSettings,
    ) -> RestoreReport {
        match prefs.get_pref(KEY_SETTINGS) {
            Some(Value::Object(saved)) => Self::restore_from(&saved, allow_list, target),
            Some(_) => {
                warn!("`settings` in preferences is not an object; ignoring");
                RestoreReport::default()
            }
            None => RestoreReport::default(),
        }
    }

    pub fn restore_from(
        saved: &Map<String, Value>,
        allow_list: &[&str],
        target: &mut AppSettings,
    ) -> RestoreReport {
        let mut report = RestoreReport::default();
        for (key, value) in saved {
            if !allow_list.contains(&key.as_str()) {
                warn!(key = %key, "skipping settings key outside allow-list");
                report.skipped.push(key.clone());
                continue;
            }
            match target.apply(key, value.clone()) {
                Ok(()) => report.applied.push(key.clone()),
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping settings key");
                    report.skipped.push(key.clone());
                }
            }
        }
        report
    }
}
