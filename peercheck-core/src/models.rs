use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Flat keys of the preference document used by the reminder scheduler.
pub const KEY_LOGS_CLICKED_ONCE: &str = "logs_clicked_once";
pub const KEY_SUPPRESS_LOGS_NAG: &str = "suppress_logs_nag";
pub const KEY_RUNS_WITHOUT_LOGS_CLICK: &str = "runs_without_logs_click";
pub const KEY_INCLUDE_LOGS: &str = "include_logs";

/// Nested sub-maps of the preference document.
pub const KEY_DIRS: &str = "dirs";
pub const KEY_SETTINGS: &str = "settings";

pub const DIR_DATA: &str = "data";
pub const DIR_OUTPUT: &str = "output";

pub const SOFT_REMINDER_DISMISS: Duration = Duration::from_secs(8);

/// Projection of the three scheduler keys of the preference document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerState {
    pub acknowledged: bool,
    pub suppressed: bool,
    pub run_count: u64,
}

impl SchedulerState {
    pub fn is_inert(&self) -> bool {
        self.acknowledged || self.suppressed
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Soft,
    Strong,
    LogsEnabled,
}

/// A popup request handed to the UI shell. The shell owns any timers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reminder {
    pub kind: ReminderKind,
    pub message: String,
    pub auto_dismiss: Option<Duration>,
    pub offers_never_again: bool,
}

impl Reminder {
    pub fn soft(run_count: u64) -> Self {
        Self {
            kind: ReminderKind::Soft,
            message: format!(
                "You've run {run_count} checks without turning on logs. \
                 Logs make it much easier to trace an issue back to its feature."
            ),
            auto_dismiss: Some(SOFT_REMINDER_DISMISS),
            offers_never_again: false,
        }
    }

    pub fn strong(run_count: u64) -> Self {
        Self {
            kind: ReminderKind::Strong,
            message: format!(
                "{run_count} runs and logs are still off. \
                 Turn on 'Include logs' so each report gets a matching log file."
            ),
            auto_dismiss: None,
            offers_never_again: true,
        }
    }

    pub fn logs_enabled() -> Self {
        Self {
            kind: ReminderKind::LogsEnabled,
            message: "Logs are on. Each run now writes a log file next to its report.".to_string(),
            auto_dismiss: None,
            offers_never_again: false,
        }
    }
}
