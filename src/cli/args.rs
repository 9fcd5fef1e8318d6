use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "xenvault", disable_version_flag = true)]
pub struct Cli {
    /// Config file path
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Echo every xe invocation (password masked)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Back up only these VM uuids, overriding backupVms
    #[arg(long = "vm", value_name = "UUID")]
    pub vms: Vec<String>,

    /// Print the resolved VM selection and exit
    #[arg(long)]
    pub print_selection: bool,

    /// Write an example config to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["print_selection", "vms"])]
    pub init: Option<PathBuf>,

    #[arg(long)]
    pub version: bool,
}
