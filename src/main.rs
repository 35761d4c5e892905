mod analyze;
mod build_label;
mod cli;
mod config;
mod error;
mod gate;
mod report;
mod scan;
mod types;

use crate::analyze::ToolKind;
use crate::build_label::BuildLabel;
use crate::config::RunSettings;
use crate::error::DashboardError;
use crate::types::config::{validate_threshold, PhpUnitMode};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const RUNTIME_FAILURE: i32 = 3;
    pub const ACCEPTANCE_FAILURE: i32 = 90;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run() -> Result<i32, DashboardError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        cli::Commands::Run(cmd) => {
            if !cmd.log_root.is_dir() {
                return Err(DashboardError::PathNotFound(
                    cmd.log_root.display().to_string(),
                ));
            }

            let loaded = config::load_config(&cmd.log_root, cmd.config.as_deref())?;
            let mut settings = RunSettings::from_config(&cmd.log_root, &loaded);
            if let Some(threshold) = cmd.acceptance {
                validate_threshold(threshold)?;
                settings.acceptance = Some(threshold);
            }
            if let Some(mode) = cmd.phpunit_mode {
                settings.phpunit_mode = match mode {
                    cli::PhpUnitModeArg::Suites => PhpUnitMode::Suites,
                    cli::PhpUnitModeArg::Combined => PhpUnitMode::Combined,
                };
            }
            settings.build_release = cmd.build_release;

            let build = settings.build_release.as_deref().map(BuildLabel::parse);
            if let Some(build) = &build {
                info!(label = build.raw(), build = %build, "scoring build");
            }

            let folders = scan::discover(&settings)?;
            let summary = analyze::analyze(&folders, &settings)?;

            let summary_path = settings.summary_path();
            std::fs::write(&summary_path, summary.export()?)?;
            info!(path = %summary_path.display(), "summary written");

            let output_format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
            };
            if !cli.quiet {
                let rendered = report::render(&summary, build.as_ref(), output_format)?;
                println!("{rendered}");
            }

            let Some(threshold) = settings.acceptance else {
                info!("no acceptance threshold configured, gate skipped");
                return Ok(exit_code::SUCCESS);
            };
            match gate::check(&summary, threshold) {
                gate::Outcome::Pass { global } => {
                    info!(global, threshold, "acceptance reached");
                    Ok(exit_code::SUCCESS)
                }
                gate::Outcome::Fail { message } => {
                    eprintln!("{message}");
                    Ok(exit_code::ACCEPTANCE_FAILURE)
                }
                gate::Outcome::Ungraded => {
                    warn!(threshold, "no weighted score produced, acceptance not evaluated");
                    Ok(exit_code::SUCCESS)
                }
            }
        }
        cli::Commands::Tools => {
            for kind in ToolKind::ALL {
                let modes: &[PhpUnitMode] = match kind {
                    ToolKind::PhpUnit => &[PhpUnitMode::Combined, PhpUnitMode::Suites],
                    _ => &[PhpUnitMode::Combined],
                };
                for &mode in modes {
                    let scope = match (kind, mode) {
                        (ToolKind::PhpUnit, PhpUnitMode::Combined) => " (combined mode)",
                        (ToolKind::PhpUnit, PhpUnitMode::Suites) => " (suites mode)",
                        _ => "",
                    };
                    for spec in kind.handler(mode).specs() {
                        println!(
                            "{}\t{}\t{}\t{}{}",
                            kind.id(),
                            spec.id,
                            spec.name,
                            spec.coefficient,
                            scope
                        );
                    }
                }
            }
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
