use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "qa-dashboard",
    version,
    about = "Scores QA tool reports and gates builds on a weighted quality index"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score every tool folder under a log root and write the summary file
    Run(RunCommand),
    /// List recognised tool folders and their score weights
    Tools,
}

#[derive(Args)]
pub struct RunCommand {
    /// Directory holding one sub-folder per QA tool
    pub log_root: PathBuf,

    /// Build identifier, usually a YYYYMMDDhhmm timestamp
    #[arg(long)]
    pub build_release: Option<String>,

    /// Minimum global score (0-100) required to pass
    #[arg(long)]
    pub acceptance: Option<f64>,

    /// Extra TOML config merged over the log root's qa-dashboard.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,

    #[arg(long, value_enum)]
    pub phpunit_mode: Option<PhpUnitModeArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PhpUnitModeArg {
    Suites,
    Combined,
}
