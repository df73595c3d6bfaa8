use anyhow::Result;
use peercheck_core::AppSettings;
use std::io::IsTerminal;
use std::path::Path;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const MAX_HEADER_LINES: usize = 5;

/// How colored values are rendered, in the console and by the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Off,
    Ansi,
    /// Colored squares in the text itself; survives pipes and log files.
    Emoji,
}

impl ColorMode {
    /// `ANSI` falls back to `EMOJI` when the console is not a terminal.
    /// Unrecognized values read as `OFF`.
    pub fn resolve(setting: &str, is_tty: bool) -> Self {
        match setting.trim().to_ascii_uppercase().as_str() {
            "ANSI" if is_tty => ColorMode::Ansi,
            "ANSI" | "EMOJI" => ColorMode::Emoji,
            _ => ColorMode::Off,
        }
    }

    pub fn for_console(settings: &AppSettings) -> Self {
        Self::resolve(&settings.log_color_mode, console_is_tty())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Off => "OFF",
            ColorMode::Ansi => "ANSI",
            ColorMode::Emoji => "EMOJI",
        }
    }
}

fn console_is_tty() -> bool {
    let dumb = std::env::var("TERM").map_or(true, |t| t.is_empty() || t == "dumb");
    std::io::stderr().is_terminal() && (cfg!(windows) || !dumb)
}

/// Console logging, plus a plain-text file when `log_file` is given.
/// `RUST_LOG` overrides the level picked from `log_detail`.
pub fn init(settings: &AppSettings, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let verbose = settings.is_debug();
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ColorMode::for_console(settings) == ColorMode::Ansi)
        .with_target(verbose)
        .with_file(verbose)
        .with_line_number(verbose);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let name = path.file_name().unwrap_or_else(|| "peercheck.log".as_ref());
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(verbose)
                .with_file(verbose)
                .with_line_number(verbose);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}

/// Legend block written once at the start of a run.
pub fn log_abbrev_header(settings: &AppSettings) {
    if !settings.log_show_abbrev_header {
        return;
    }
    let lines: Vec<&str> = settings
        .log_abbrev_header_lines
        .iter()
        .map(String::as_str)
        .take(MAX_HEADER_LINES)
        .collect();
    if lines.is_empty() {
        return;
    }
    let emit = |line: &str| {
        if settings.is_debug() {
            debug!("{line}");
        } else {
            info!("{line}");
        }
    };
    emit("==== Legend / Abbreviations ====");
    for line in lines {
        emit(line);
    }
    emit("==== End Legend ====");
}
