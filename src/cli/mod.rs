use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::Cli;
use crate::cli::commands::{backup, exit_for_error, init};
use crate::types::RunMode;

const CONFIG_FILE: &str = "/etc/xenvault.yaml";
const VERSION: &str = env!("CARGO_PKG_VERSION");
const LICENSE_NAME: &str = "GNU GPL v3 or later";

pub mod args;
pub mod commands;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.version {
        println!("Xenvault {}", VERSION);
        println!("License: {}", LICENSE_NAME);
        return Ok(());
    }

    if let Some(path) = &cli.init {
        if let Err(err) = init::run_init(path) {
            exit_for_error(&err);
        }
        return Ok(());
    }

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let run_mode = RunMode {
        verbose: cli.verbose,
    };
    if let Err(err) =
        backup::run_backup_command(&config_path, &cli.vms, cli.print_selection, run_mode)
    {
        exit_for_error(&err);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
