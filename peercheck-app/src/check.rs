use crate::logging::ColorMode;
use async_trait::async_trait;
use peercheck_core::{CheckRoutine, CoreError, RunPlan};
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

const STDERR_TAIL_LINES: usize = 20;

/// Runs an external checker as
/// `<program> [args..] <data_dir> <output_dir> <workbook_path>`.
/// The resolved color mode is passed in `PEERCHECK_COLOR_MODE`.
pub struct ProcessCheck {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub color_mode: ColorMode,
}

#[async_trait]
impl CheckRoutine for ProcessCheck {
    async fn run(&self, plan: &RunPlan) -> Result<(), CoreError> {
        info!(
            program = %self.program.display(),
            data = %plan.data_dir.display(),
            output = %plan.output_dir.display(),
            "starting checks"
        );
        let out = Command::new(&self.program)
            .args(&self.args)
            .arg(&plan.data_dir)
            .arg(&plan.output_dir)
            .arg(plan.workbook_path())
            .env("PEERCHECK_LOG_FILE", plan.log_path())
            .env("PEERCHECK_COLOR_MODE", self.color_mode.as_str())
            .output()
            .await
            .map_err(|e| {
                CoreError::Check(format!("could not start {}: {e}", self.program.display()))
            })?;

        let stdout = String::from_utf8_lossy(&out.stdout);
        for line in stdout.lines() {
            debug!(target: "peercheck::checker", "{line}");
        }
        if out.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&out.stderr);
        Err(CoreError::Check(failure_message(&out.status.to_string(), &stderr)))
    }
}

fn failure_message(status: &str, stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let tail = &lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..];
    if tail.is_empty() {
        format!("checker {status}")
    } else {
        format!("checker {status}: {}", tail.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_keeps_stderr_tail() {
        let stderr: String = (1..=30).map(|i| format!("line {i}\n")).collect();
        let msg = failure_message("exit status: 2", &stderr);
        assert!(msg.starts_with("checker exit status: 2: line 11"));
        assert!(msg.ends_with("line 30"));
        assert_eq!(failure_message("exit status: 1", "\n \n"), "checker exit status: 1");
    }
}
