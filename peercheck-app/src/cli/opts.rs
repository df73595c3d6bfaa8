use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "peercheck",
    version,
    about = "PeerCheck data checks with remembered folders and settings"
)]
pub struct Cli {
    /// Bootstrap record location (defaults to beside the executable)
    #[arg(long, env = "PEERCHECK_BOOTSTRAP")]
    pub bootstrap: Option<PathBuf>,

    /// Base directory used when no bootstrap record exists yet
    #[arg(long, env = "PEERCHECK_DEFAULT_BASE_DIR")]
    pub default_base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the data checks
    Run(RunCmd),
    /// Flip "Include logs" (stops the logs reminders for good)
    ToggleLogs,
    /// Never show the logs reminders again
    NeverAgain,
    /// Show where preferences live and the reminder state
    Status,
    /// Where the preference file is kept
    #[command(subcommand)]
    BaseDir(BaseDirCmd),
    /// Remembered folders
    #[command(subcommand)]
    Dir(DirCmd),
    /// User settings
    #[command(subcommand)]
    Settings(SettingsCmd),
    /// Raw preference keys
    #[command(subcommand)]
    Pref(PrefCmd),
}

#[derive(Debug, Args, Clone)]
pub struct RunCmd {
    /// Folder with the exported data (defaults to the last one used)
    #[arg(long)]
    pub data: Option<PathBuf>,
    /// Folder for the report and log (defaults to the last one used)
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Program that performs the checks
    #[arg(long, env = "PEERCHECK_CHECKER")]
    pub checker: PathBuf,
    /// Extra arguments passed to the checker before the folders
    #[arg(long = "checker-arg")]
    pub checker_args: Vec<String>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum BaseDirCmd {
    Show,
    Set { dir: PathBuf },
}

#[derive(Debug, Subcommand, Clone)]
pub enum DirCmd {
    Get { category: String },
    Set { category: String, dir: PathBuf },
    List,
}

#[derive(Debug, Subcommand, Clone)]
pub enum SettingsCmd {
    Show,
    /// Save the current settings, after applying any `key=value` overrides
    Apply {
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
    },
}

#[derive(Debug, Subcommand, Clone)]
pub enum PrefCmd {
    Get { key: String },
    /// Value is parsed as JSON, falling back to a plain string
    Set { key: String, value: String },
}
