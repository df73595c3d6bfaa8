use peercheck_core::{
    AppSettings, CoreError, MemoryPrefs, PrefsBackend, SettingsSnapshot, KEY_SETTINGS,
    SETTINGS_ALLOW_LIST,
};
use serde_json::{json, Map};

#[test]
fn restore_applies_only_allow_listed_keys() {
    let prefs = MemoryPrefs::new();
    prefs
        .set_pref(
            KEY_SETTINGS,
            json!({
                "write_log_file": true,
                "output_xlsx": "x",
                "show_all_sheets": false
            }),
        )
        .unwrap();

    let mut target = AppSettings::default();
    let before_sheets = target.show_all_sheets;
    let report =
        SettingsSnapshot::restore(&prefs, &["write_log_file", "output_xlsx"], &mut target);

    assert!(target.write_log_file);
    assert_eq!(target.output_xlsx, "x");
    assert_eq!(target.show_all_sheets, before_sheets);
    assert_eq!(report.skipped, vec!["show_all_sheets".to_string()]);
    assert_eq!(report.applied.len(), 2);
}

#[test]
fn apply_then_restore_reproduces_settings() {
    let prefs = MemoryPrefs::new();
    prefs.set_pref("include_logs", json!(true)).unwrap();

    let mut current = AppSettings::default();
    current.log_detail = "DEBUG".into();
    current.log_abbrev_header_lines = vec!["NAP = Network Access Point".into(), "".into()];
    current.log_nid_debug = true;
    let snapshot = SettingsSnapshot::apply(&prefs, &current, SETTINGS_ALLOW_LIST).unwrap();
    assert_eq!(snapshot.len(), SETTINGS_ALLOW_LIST.len());
    assert!(snapshot["log_abbrev_header_lines"].is_array());

    let mut restored = AppSettings::default();
    let report = SettingsSnapshot::restore(&prefs, SETTINGS_ALLOW_LIST, &mut restored);
    assert_eq!(restored, current);
    assert!(report.skipped.is_empty());
    assert_eq!(prefs.get_pref("include_logs"), Some(json!(true)));
}

#[test]
fn wrong_type_is_skipped() {
    let mut saved = Map::new();
    saved.insert("log_nid_debug".into(), json!("sometimes"));
    saved.insert("log_detail".into(), json!("DEBUG"));

    let mut target = AppSettings::default();
    let report = SettingsSnapshot::restore_from(&saved, SETTINGS_ALLOW_LIST, &mut target);
    assert!(!target.log_nid_debug);
    assert!(target.is_debug());
    assert_eq!(report.skipped, vec!["log_nid_debug".to_string()]);
}

#[test]
fn apply_rejects_unknown_field() {
    let mut s = AppSettings::default();
    let err = s.apply("LOG_FILE", json!("x.log")).unwrap_err();
    assert!(matches!(err, CoreError::UnknownSetting(k) if k == "LOG_FILE"));
    assert_eq!(s, AppSettings::default());
}

#[test]
fn non_object_settings_are_ignored() {
    let prefs = MemoryPrefs::new();
    prefs.set_pref(KEY_SETTINGS, json!([1, 2])).unwrap();
    let mut target = AppSettings::default();
    let report = SettingsSnapshot::restore(&prefs, SETTINGS_ALLOW_LIST, &mut target);
    assert_eq!(report, Default::default());
    assert_eq!(target, AppSettings::default());
}
