//! Interactive roster entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags/environment.
//! - Start logging, initialize the store, then hand stdin/stdout to the menu.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use roster_core::{FileUserRepository, UserService};
use std::io;
use std::path::PathBuf;

mod menu;

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(about = "Maintain a small user roster stored as a comma-delimited text file.")]
#[command(version)]
struct Cli {
    #[arg(
        long,
        env = "ROSTER_FILE",
        default_value = "user_data.txt",
        help = "Path of the roster file"
    )]
    file: PathBuf,

    #[arg(
        long,
        env = "ROSTER_LOG_DIR",
        help = "Directory for log files [default: ./logs]"
    )]
    log_dir: Option<PathBuf>,

    #[arg(long, env = "ROSTER_LOG_LEVEL", help = "trace|debug|info|warn|error")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = resolve_log_dir(cli.log_dir)?;
    let log_dir = log_path
        .to_str()
        .ok_or_else(|| anyhow!("log directory is not valid UTF-8: {}", log_path.display()))?;
    let level = cli
        .log_level
        .unwrap_or_else(|| roster_core::default_log_level().to_string());
    roster_core::init_logging(&level, log_dir).map_err(|err| anyhow!(err))?;

    let service = UserService::new(FileUserRepository::new(cli.file));
    let stdin = io::stdin();
    let stdout = io::stdout();
    menu::run(&service, stdin.lock(), stdout.lock()).context("menu I/O failed")?;
    Ok(())
}

fn resolve_log_dir(log_dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = log_dir.unwrap_or_else(|| PathBuf::from("logs"));
    if dir.is_absolute() {
        return Ok(dir);
    }
    let cwd = std::env::current_dir().context("cannot read current directory")?;
    Ok(cwd.join(dir))
}
