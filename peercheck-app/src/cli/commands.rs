use crate::check::ProcessCheck;
use crate::cli::opts::*;
use crate::logging::ColorMode;
use crate::{crash, logging};

use anyhow::{anyhow, bail, Result};
use chrono::Local;
use peercheck_core::{
    validate_run_dirs, AppSettings, CheckRoutine, NotificationScheduler, PrefsBackend, Reminder,
    ReminderKind, RestoreReport, RunPlan, SettingsSnapshot, DIR_DATA, DIR_OUTPUT, KEY_INCLUDE_LOGS,
    SETTINGS_ALLOW_LIST,
};
use peercheck_json::{paths, BootstrapPointer, PreferenceStore};
use serde_json::Value;
use std::io::{stdin, stdout, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub async fn run_cli(args: Cli) -> Result<()> {
    let store = open_store(&args);
    // nothing is logged yet; the report is replayed once logging is up
    let mut settings = AppSettings::default();
    let restored = SettingsSnapshot::restore(&store, SETTINGS_ALLOW_LIST, &mut settings);

    match args.cmd {
        Command::Run(cmd) => run_cmd(&store, &settings, &restored, cmd).await,
        cmd => {
            let _guard = logging::init(&settings, None)?;
            log_restore(&restored);
            prefs_cmd(&store, settings, cmd)
        }
    }
}

fn prefs_cmd(store: &PreferenceStore, settings: AppSettings, cmd: Command) -> Result<()> {
    match cmd {
        Command::ToggleLogs => toggle_logs_cmd(store),
        Command::NeverAgain => {
            NotificationScheduler::new(store).on_never_again()?;
            println!("Logs reminders turned off.");
            Ok(())
        }
        Command::Status => status_cmd(store),
        Command::BaseDir(cmd) => base_dir_cmd(store, cmd),
        Command::Dir(cmd) => dir_cmd(store, cmd),
        Command::Settings(cmd) => settings_cmd(store, settings, cmd),
        Command::Pref(cmd) => pref_cmd(store, cmd),
        Command::Run(_) => unreachable!(),
    }
}

pub fn open_store(args: &Cli) -> PreferenceStore {
    let bootstrap = args
        .bootstrap
        .clone()
        .map(BootstrapPointer::new)
        .unwrap_or_else(BootstrapPointer::at_default);
    let default_base = args
        .default_base_dir
        .clone()
        .unwrap_or_else(paths::default_base_dir);
    PreferenceStore::open(bootstrap, &default_base)
}

async fn run_cmd(
    store: &PreferenceStore,
    settings: &AppSettings,
    restored: &RestoreReport,
    cmd: RunCmd,
) -> Result<()> {
    let data = match cmd.data {
        Some(d) => absolute(&d)?,
        None => store.get_last_dir(DIR_DATA, Path::new("")),
    };
    let output = match cmd.output {
        Some(d) => absolute(&d)?,
        None => store.get_last_dir(DIR_OUTPUT, Path::new("")),
    };
    if let Err(msg) = validate_run_dirs(&data, &output) {
        bail!(msg);
    }

    let plan = RunPlan::new(&data, &output, Local::now().naive_local());
    let include_logs = settings.write_log_file || store.get(KEY_INCLUDE_LOGS, false);
    let log_file = include_logs.then(|| plan.log_path());
    let _guard = logging::init(settings, log_file.as_deref())?;
    log_restore(restored);
    logging::log_abbrev_header(settings);
    info!(base = %plan.base_name, output = %plan.output_dir.display(), "run planned");

    for (category, dir) in [(DIR_DATA, &data), (DIR_OUTPUT, &output)] {
        if let Err(e) = store.update_last_dir(category, dir) {
            warn!(category, error = %e, "could not remember folder");
        }
    }

    let scheduler = NotificationScheduler::new(store);
    match scheduler.on_run_event() {
        Ok(Some(reminder)) => show_reminder(&scheduler, &reminder)?,
        Ok(None) => {}
        Err(e) => warn!(error = %e, "could not update logs reminder state"),
    }

    println!("Running checks...");
    let checker = ProcessCheck {
        program: cmd.checker,
        args: cmd.checker_args,
        color_mode: ColorMode::for_console(settings),
    };
    match checker.run(&plan).await {
        Ok(()) => {
            info!("checks finished");
            println!("Done: {}", plan.workbook_path().display());
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "checks failed");
            crash::write_crash_log(&plan.output_dir, &e);
            println!("Failed: {e}");
            Err(e.into())
        }
    }
}

fn toggle_logs_cmd(store: &PreferenceStore) -> Result<()> {
    let on = !store.get(KEY_INCLUDE_LOGS, false);
    store.set(KEY_INCLUDE_LOGS, &on)?;
    println!("Include logs: {}", if on { "on" } else { "off" });

    let scheduler = NotificationScheduler::new(store);
    if let Some(reminder) = scheduler.on_acknowledge_event()? {
        show_reminder(&scheduler, &reminder)?;
    }
    Ok(())
}

fn status_cmd(store: &PreferenceStore) -> Result<()> {
    let state = NotificationScheduler::new(store).state();
    println!("base dir\t{}", store.base_dir().display());
    println!("prefs file\t{}", store.file_path().display());
    println!("include logs\t{}", store.get(KEY_INCLUDE_LOGS, false));
    println!(
        "reminders\tacknowledged={} suppressed={} runs={}",
        state.acknowledged, state.suppressed, state.run_count
    );
    for (category, dir) in store.dirs().all() {
        println!("dir:{category}\t{}", dir.display());
    }
    Ok(())
}

fn base_dir_cmd(store: &PreferenceStore, cmd: BaseDirCmd) -> Result<()> {
    match cmd {
        BaseDirCmd::Show => println!("{}", store.base_dir().display()),
        BaseDirCmd::Set { dir } => {
            let dir = absolute(&dir)?;
            store.set_base_dir(&dir)?;
            println!("Preferences now stored in {}", store.file_path().display());
        }
    }
    Ok(())
}

fn dir_cmd(store: &PreferenceStore, cmd: DirCmd) -> Result<()> {
    match cmd {
        DirCmd::Get { category } => match store.dirs().all().remove(&category) {
            Some(dir) => println!("{}", dir.display()),
            None => println!("(unset)"),
        },
        DirCmd::Set { category, dir } => {
            let dir = absolute(&dir)?;
            if !dir.is_dir() {
                warn!(dir = %dir.display(), "remembering a folder that does not exist");
            }
            store.update_last_dir(&category, &dir)?;
            println!("ok");
        }
        DirCmd::List => {
            for (category, dir) in store.dirs().all() {
                println!("{category}\t{}", dir.display());
            }
        }
    }
    Ok(())
}

fn settings_cmd(
    store: &PreferenceStore,
    mut settings: AppSettings,
    cmd: SettingsCmd,
) -> Result<()> {
    match cmd {
        SettingsCmd::Show => println!("{}", serde_json::to_string_pretty(&settings)?),
        SettingsCmd::Apply { overrides } => {
            for pair in overrides {
                let (key, raw) = pair
                    .split_once('=')
                    .ok_or_else(|| anyhow!("expected KEY=VALUE, got {pair:?}"))?;
                settings.apply(key.trim(), parse_value(raw))?;
            }
            let snapshot = SettingsSnapshot::apply(store, &settings, SETTINGS_ALLOW_LIST)?;
            println!("Settings saved ({} keys)", snapshot.len());
        }
    }
    Ok(())
}

fn pref_cmd(store: &PreferenceStore, cmd: PrefCmd) -> Result<()> {
    match cmd {
        PrefCmd::Get { key } => match store.get_pref(&key) {
            Some(v) => println!("{v}"),
            None => println!("(unset)"),
        },
        PrefCmd::Set { key, value } => {
            store.set_pref(&key, parse_value(&value))?;
            println!("ok");
        }
    }
    Ok(())
}

// ===== Helpers =====
fn show_reminder<B: PrefsBackend>(
    scheduler: &NotificationScheduler<B>,
    r: &Reminder,
) -> Result<()> {
    let title = match r.kind {
        ReminderKind::Soft => "Tip",
        ReminderKind::Strong => "Turn on logs",
        ReminderKind::LogsEnabled => "Logs enabled",
    };
    println!("\n*** {title} ***\n{}", r.message);

    // the shell closes auto-dismissing popups on its own; nothing to wait for here
    if let Some(delay) = r.auto_dismiss {
        println!("(closes in {}s)\n", delay.as_secs());
        return Ok(());
    }
    if !stdin().is_terminal() {
        return Ok(());
    }
    if r.offers_never_again {
        let answer = read_line("[enter=dismiss, n=never show again] ")?;
        if matches!(answer.trim().to_lowercase().as_str(), "n" | "never") {
            scheduler.on_never_again()?;
            println!("Logs reminders turned off.");
        }
    } else {
        read_line("[enter=dismiss] ")?;
    }
    Ok(())
}

fn log_restore(report: &RestoreReport) {
    for key in &report.skipped {
        warn!(key = %key, "saved setting not applied");
    }
    if !report.applied.is_empty() {
        info!(count = report.applied.len(), "settings restored");
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn absolute(p: &Path) -> Result<PathBuf> {
    if p.is_absolute() {
        Ok(p.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(p))
    }
}

fn read_line(prompt: &str) -> Result<String> { print!("{prompt}"); stdout().flush().ok(); let mut s = String::new(); stdin().read_line(&mut s)?; Ok(s) }
