use std::path::PathBuf;

use clap::Parser;

/// Review and label commits one at a time, then export the labeled dataset.
#[derive(Debug, Parser)]
#[command(name = "studio", version, about)]
pub struct Args {
    /// JSONL dataset to import at startup, replacing the restored session.
    pub file: Option<PathBuf>,

    /// Config file (defaults to $XDG_CONFIG_HOME/studio/config.toml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Session store path (overrides `database` from the config).
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Directory exports are written to (overrides `output_dir`).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}
