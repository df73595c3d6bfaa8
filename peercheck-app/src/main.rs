mod check;
mod cli;
mod crash;
mod logging;

use anyhow::Result;
use clap::Parser; // needed for Cli::parse()
use std::path::PathBuf;
use tokio::runtime::Runtime;

use cli::commands::run_cli;
use cli::opts::Cli;

fn main() -> Result<()> {
    let args = Cli::parse();
    crash::install_panic_hook(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    // Store and scheduler calls are synchronous; the runtime only drives the checker process
    let rt = Runtime::new()?;
    rt.block_on(run_cli(args))
}
