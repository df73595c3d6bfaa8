use crate::{
    CoreError, PrefsBackend, Reminder, ReminderKind, SchedulerState, KEY_LOGS_CLICKED_ONCE,
    KEY_RUNS_WITHOUT_LOGS_CLICK, KEY_SUPPRESS_LOGS_NAG,
};
use serde_json::Value;
use tracing::{debug, info};

pub const SOFT_REMINDER_RUN: u64 = 5;
pub const STRONG_REMINDER_FROM: u64 = 10;
pub const STRONG_REMINDER_EVERY: u64 = 5;

/// Severity of the reminder due after `run_count` unacknowledged runs.
pub fn escalation(run_count: u64) -> Option<ReminderKind> {
    if run_count == SOFT_REMINDER_RUN {
        Some(ReminderKind::Soft)
    } else if run_count >= STRONG_REMINDER_FROM && run_count % STRONG_REMINDER_EVERY == 0 {
        Some(ReminderKind::Strong)
    } else {
        None
    }
}

/// Decides when to nag about logs. Holds no state of its own: every call
/// reads the backend and every transition is written back before returning.
pub struct NotificationScheduler<B: PrefsBackend> {
    prefs: B,
}

impl<B: PrefsBackend> NotificationScheduler<B> {
    pub fn new(prefs: B) -> Self {
        Self { prefs }
    }

    pub fn state(&self) -> SchedulerState {
        SchedulerState {
            acknowledged: self.prefs.get_bool(KEY_LOGS_CLICKED_ONCE, false),
            suppressed: self.prefs.get_bool(KEY_SUPPRESS_LOGS_NAG, false),
            run_count: self.prefs.get_count(KEY_RUNS_WITHOUT_LOGS_CLICK),
        }
    }

    pub fn on_run_event(&self) -> Result<Option<Reminder>, CoreError> {
        let state = self.state();
        if state.is_inert() {
            return Ok(None);
        }

        let run_count = state.run_count.saturating_add(1);
        self.prefs
            .set_pref(KEY_RUNS_WITHOUT_LOGS_CLICK, Value::from(run_count))?;

        let reminder = match escalation(run_count) {
            Some(ReminderKind::Soft) => Some(Reminder::soft(run_count)),
            Some(ReminderKind::Strong) => Some(Reminder::strong(run_count)),
            _ => None,
        };
        match &reminder {
            Some(r) => info!(run_count, kind = ?r.kind, "logs reminder due"),
            None => debug!(run_count, "run without logs"),
        }
        Ok(reminder)
    }

    pub fn on_never_again(&self) -> Result<(), CoreError> {
        self.prefs.set_pref(KEY_SUPPRESS_LOGS_NAG, Value::Bool(true))?;
        info!("logs reminders suppressed");
        Ok(())
    }

    /// Latches the acknowledgement. Returns the one-time confirmation popup
    /// only on the first call for this document.
    pub fn on_acknowledge_event(&self) -> Result<Option<Reminder>, CoreError> {
        let first_time = !self.state().acknowledged;
        self.prefs.set_prefs(&[
            (KEY_LOGS_CLICKED_ONCE, Value::Bool(true)),
            (KEY_RUNS_WITHOUT_LOGS_CLICK, Value::from(0u64)),
        ])?;
        if first_time {
            info!("logs acknowledged");
            Ok(Some(Reminder::logs_enabled()))
        } else {
            Ok(None)
        }
    }
}
