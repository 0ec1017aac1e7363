use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "granary",
    about = "Granary: bounded multi-container storage",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Walk through the reference scenario on a 10/20 store
    Demo,
    /// Execute an operation script against a fresh store
    Run(RunArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// TOML file of `[[op]]` entries
    pub script: PathBuf,
    /// TOML file with `container_capacity` and `storage_capacity`
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub container_capacity: Option<f32>,
    #[arg(long)]
    pub storage_capacity: Option<f32>,
    /// Stop at the first failing operation
    #[arg(long)]
    pub strict: bool,
}
