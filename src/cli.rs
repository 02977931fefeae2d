use clap::Parser;
use std::path::PathBuf;

use crate::speech::Backend;

#[derive(Parser, Debug)]
#[command(name = "recmon", about = "Speak a summary of system resource usage")]
pub struct Cli {
    /// Report to produce: 1 CPU, 2 RAM, 3 disks, 4 uptime, 5 network
    #[arg(allow_negative_numbers = true)]
    pub selector: i64,

    /// Configuration file (defaults to <config dir>/recmon/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Speech backend, overriding the configuration file
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// Do not print the report on stdout
    #[arg(long)]
    pub quiet: bool,
}
