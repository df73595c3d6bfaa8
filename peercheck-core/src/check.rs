use crate::{CoreError, RunPlan};
use async_trait::async_trait;
use std::path::Path;

/// The long-running data check. Only success or a descriptive failure is
/// interpreted; whatever it writes into the output folder is its own business.
#[async_trait]
pub trait CheckRoutine: Send + Sync {
    async fn run(&self, plan: &RunPlan) -> Result<(), CoreError>;
}

/// Both folders must exist before a check is started.
pub fn validate_run_dirs(data_dir: &Path, output_dir: &Path) -> Result<(), &'static str> {
    if data_dir.as_os_str().is_empty() || output_dir.as_os_str().is_empty() {
        return Err("Select both a data folder and an output folder.");
    }
    if !data_dir.is_dir() {
        return Err("Data folder does not exist.");
    }
    if !output_dir.is_dir() {
        return Err("Output folder does not exist.");
    }
    Ok(())
}
