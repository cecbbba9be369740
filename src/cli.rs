use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::MetricsConfig;

pub mod commands;

pub use commands::{cmd_check, cmd_remove, cmd_show, cmd_write, render_text};

#[derive(Parser, Debug)]
#[command(
    name = "odrmetrics",
    version,
    about = "Inspect and produce odrefresh compilation-metrics records",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Read a record and print it (text or JSON)
    Show {
        /// Defaults to ODR_METRICS_FILE or the on-device location
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Read and validate a record; prints "ok" or the error, exit code 1 on failure
    Check {
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Write a record from a JSON file (validated first)
    Write {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        from_json: PathBuf,
    },
    /// Remove the record file if present
    Remove {
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = MetricsConfig::from_env();

    match cli.cmd {
        Cmd::Show { path, json } => {
            let path = path.unwrap_or_else(|| cfg.metrics_file.clone());
            cmd_show(&path, &cfg.read_options(), json)?;
        }
        Cmd::Check { path } => {
            let path = path.unwrap_or_else(|| cfg.metrics_file.clone());
            if !cmd_check(&path, &cfg.read_options()) {
                std::process::exit(1);
            }
        }
        Cmd::Write { path, from_json } => {
            cmd_write(&path, &from_json, &cfg)?;
        }
        Cmd::Remove { path } => {
            let path = path.unwrap_or_else(|| cfg.metrics_file.clone());
            cmd_remove(&path)?;
        }
    }
    Ok(())
}
