use chrono::Local;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes `crash_<timestamp>.log` into `dir`. Best effort: a crash log that
/// cannot be written is reported on stderr and otherwise ignored.
pub fn write_crash_log(dir: &Path, what: impl Display) -> Option<PathBuf> {
    let ts = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = dir.join(format!("crash_{ts}.log"));
    let body = format!(
        "Unhandled error at {ts}\n{}\n{what}\n",
        "=".repeat(80)
    );
    match fs::write(&path, body) {
        Ok(()) => {
            eprintln!("crash log written to: {}", path.display());
            Some(path)
        }
        Err(e) => {
            eprintln!("failed to write crash log {}: {e}", path.display());
            None
        }
    }
}

pub fn install_panic_hook(dir: PathBuf) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let bt = std::backtrace::Backtrace::force_capture();
        write_crash_log(&dir, format!("{info}\n\n{bt}"));
        previous(info);
    }));
}
