use peercheck_core::{
    AppSettings, CoreError, NotificationScheduler, PrefsBackend, ReminderKind, SettingsSnapshot,
    DIR_DATA, DIR_OUTPUT, KEY_RUNS_WITHOUT_LOGS_CLICK, SETTINGS_ALLOW_LIST,
};
use peercheck_json::{BootstrapPointer, PreferenceStore};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    _root: TempDir,
    app_dir: PathBuf,
    default_base: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let app_dir = root.path().join("app");
        let default_base = root.path().join("default");
        fs::create_dir_all(&app_dir).unwrap();
        fs::create_dir_all(&default_base).unwrap();
        Self {
            _root: root,
            app_dir,
            default_base,
        }
    }

    fn bootstrap(&self) -> BootstrapPointer {
        BootstrapPointer::new(self.app_dir.join("peercheck_bootstrap.json"))
    }

    /// A fresh process: new pointer, new store, same files.
    fn open(&self) -> PreferenceStore {
        PreferenceStore::open(self.bootstrap(), &self.default_base)
    }

    fn mkdir(&self, name: &str) -> PathBuf {
        let p = self.default_base.parent().unwrap().join(name);
        fs::create_dir_all(&p).unwrap();
        p
    }
}

#[test]
fn pointer_falls_back_until_set() {
    let fx = Fixture::new();
    let ptr = fx.bootstrap();
    assert_eq!(ptr.get(Path::new("/fallback")), PathBuf::from("/fallback"));
    assert!(!ptr.path().exists());

    let p = fx.mkdir("p");
    ptr.set(&p).unwrap();
    assert_eq!(ptr.get(Path::new("/fallback")), p);
}

#[test]
fn writes_merge_instead_of_replacing() {
    let fx = Fixture::new();
    let store = fx.open();
    store.set("a", &1).unwrap();
    store.set("b", &2).unwrap();
    store.set("a", &10).unwrap();

    assert_eq!(store.get("a", 0), 10);
    assert_eq!(store.get("b", 0), 2);
    assert_eq!(store.get("missing", 7), 7);
    assert_eq!(store.get_pref("b"), Some(json!(2)));
}

#[test]
fn mistyped_value_reads_as_default() {
    let fx = Fixture::new();
    let store = fx.open();
    store.set("include_logs", &"sure").unwrap();
    assert!(!store.get("include_logs", false));
}

#[test]
fn relocation_starts_a_fresh_document() {
    let fx = Fixture::new();
    let p1 = fx.mkdir("p1");
    let p2 = fx.mkdir("p2");

    let store = fx.open();
    store.set_base_dir(&p1).unwrap();
    store.update_last_dir(DIR_DATA, Path::new("/x")).unwrap();
    store.set_base_dir(&p2).unwrap();

    // restart
    assert_eq!(fx.bootstrap().get(&fx.default_base), p2);
    let store = fx.open();
    assert_eq!(store.base_dir(), p2);
    assert_eq!(
        store.get_last_dir(DIR_DATA, Path::new("/default")),
        PathBuf::from("/default")
    );

    let old = PreferenceStore::open(BootstrapPointer::new(fx.app_dir.join("other.json")), &p1);
    assert_eq!(
        old.get_last_dir(DIR_DATA, Path::new("/default")),
        PathBuf::from("/x")
    );
}

#[test]
fn invalid_base_dir_keeps_previous() {
    let fx = Fixture::new();
    let p1 = fx.mkdir("p1");
    let store = fx.open();
    store.set_base_dir(&p1).unwrap();

    let missing = p1.join("gone");
    let err = store.set_base_dir(&missing).unwrap_err();
    assert!(matches!(err, CoreError::InvalidBaseDir { .. }));

    let file = p1.join("a_file");
    fs::write(&file, "").unwrap();
    assert!(store.set_base_dir(&file).is_err());

    assert_eq!(store.base_dir(), p1);
    assert_eq!(fx.bootstrap().get(&fx.default_base), p1);
}

#[test]
fn relative_base_dir_is_recorded_absolute() {
    let fx = Fixture::new();
    let cwd = std::env::current_dir().unwrap();
    let target = tempfile::tempdir_in(&cwd).unwrap();
    let name = target.path().file_name().unwrap();

    let store = fx.open();
    store.set_base_dir(Path::new(name)).unwrap();
    assert_eq!(store.base_dir(), target.path());

    let recorded = fx.bootstrap().get(&fx.default_base);
    assert!(recorded.is_absolute());
    assert_eq!(fx.open().base_dir(), target.path());
}

#[cfg(unix)]
#[test]
fn non_utf8_paths_are_refused() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fx = Fixture::new();
    let p1 = fx.mkdir("p1");
    let store = fx.open();
    store.set_base_dir(&p1).unwrap();

    let odd = p1.join(OsStr::from_bytes(b"prefs\xFF"));
    let err = store.set_base_dir(&odd).unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidBaseDir { reason: "path is not valid UTF-8", .. }
    ));
    assert_eq!(store.base_dir(), p1);

    store.set("a", &1).unwrap();
    let store = fx.open();
    assert_eq!(store.base_dir(), p1);
    assert_eq!(store.get("a", 0), 1);

    let err = store.update_last_dir(DIR_DATA, &odd).unwrap_err();
    assert!(matches!(err, CoreError::NonUtf8Path(_)));
    assert!(store.dirs().all().is_empty());
    assert!(fx.bootstrap().set(&odd).is_err());
    assert_eq!(fx.bootstrap().get(&fx.default_base), p1);
}

#[test]
fn dirs_keep_each_category() {
    let fx = Fixture::new();
    let store = fx.open();
    store.update_last_dir(DIR_DATA, Path::new("/d")).unwrap();
    store.update_last_dir(DIR_OUTPUT, Path::new("/o")).unwrap();
    store.update_last_dir(DIR_DATA, Path::new("/d2")).unwrap();

    let all = store.dirs().all();
    assert_eq!(all.len(), 2);
    assert_eq!(all[DIR_DATA], PathBuf::from("/d2"));
    assert_eq!(all[DIR_OUTPUT], PathBuf::from("/o"));
}

#[test]
fn external_edits_are_seen() {
    let fx = Fixture::new();
    let store = fx.open();
    store.set("include_logs", &false).unwrap();

    fs::write(
        store.file_path(),
        r#"{"include_logs": true, "hand_added": "yes"}"#,
    )
    .unwrap();
    assert!(store.get("include_logs", false));

    store.set("runs_without_logs_click", &1).unwrap();
    assert_eq!(store.get("hand_added", String::new()), "yes");
}

#[test]
fn scheduler_survives_restart() {
    let fx = Fixture::new();
    {
        let store = fx.open();
        let s = NotificationScheduler::new(&store);
        for _ in 0..9 {
            s.on_run_event().unwrap();
        }
    }

    let store = fx.open();
    assert_eq!(store.get_count(KEY_RUNS_WITHOUT_LOGS_CLICK), 9);
    let s = NotificationScheduler::new(&store);
    let r = s.on_run_event().unwrap().expect("strong reminder at run 10");
    assert_eq!(r.kind, ReminderKind::Strong);

    s.on_acknowledge_event().unwrap();
    let store = fx.open();
    let s = NotificationScheduler::new(&store);
    assert!(s.state().acknowledged);
    assert_eq!(s.state().run_count, 0);
    for _ in 0..20 {
        assert!(s.on_run_event().unwrap().is_none());
    }
}

#[test]
fn never_again_survives_restart() {
    let fx = Fixture::new();
    {
        let store = fx.open();
        let s = NotificationScheduler::new(&store);
        for _ in 0..10 {
            s.on_run_event().unwrap();
        }
        s.on_never_again().unwrap();
    }

    let store = fx.open();
    let s = NotificationScheduler::new(&store);
    assert!(s.state().suppressed);
    assert!(!s.state().acknowledged);
    for _ in 0..10 {
        assert!(s.on_run_event().unwrap().is_none());
    }
    assert_eq!(store.get_count(KEY_RUNS_WITHOUT_LOGS_CLICK), 10);
}

#[test]
fn settings_snapshot_through_store() {
    let fx = Fixture::new();
    let store = fx.open();
    store.update_last_dir(DIR_DATA, Path::new("/d")).unwrap();

    let mut current = AppSettings::default();
    current.write_log_file = true;
    current.log_color_mode = "EMOJI".into();
    SettingsSnapshot::apply(&store, &current, SETTINGS_ALLOW_LIST).unwrap();

    let store = fx.open();
    let mut restored = AppSettings::default();
    SettingsSnapshot::restore(&store, SETTINGS_ALLOW_LIST, &mut restored);
    assert_eq!(restored, current);
    assert_eq!(
        store.get_last_dir(DIR_DATA, Path::new("/")),
        PathBuf::from("/d")
    );
}
