// ABOUTME: Command-line interface definitions and command dispatch for hsrp-check
// ABOUTME: Loads configuration, runs device checks, and prints JSON to stdout

use crate::config::Config;
use crate::hsrp::parse_standby_brief_file;
use crate::report::run_checks;
use crate::ssh::DeviceSource;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hsrp-check")]
#[command(about = "Validate HSRP group states on network devices", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check every configured device against its expectations")]
    Check,

    #[command(about = "Print the group states found in captured 'show standby brief' output")]
    Parse { file: PathBuf },

    #[command(about = "Write the default configuration file")]
    Init {
        #[arg(long)]
        force: bool,
    },
}

/// Process exit status of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
}

pub fn run(cli: Cli) -> Result<Outcome> {
    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => check(&resolve_config_path(cli.config)?),
        Commands::Parse { file } => parse(&file),
        Commands::Init { force } => init(&resolve_config_path(cli.config)?, force),
    }
}

fn resolve_config_path(config: Option<PathBuf>) -> Result<PathBuf> {
    match config {
        Some(path) => Ok(path),
        None => Config::default_config_path(),
    }
}

fn load_config(path: &Path) -> Result<Config> {
    let mut config = Config::load_from_file(path)?;
    config.expand_path()?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(config)
}

fn check(config_path: &Path) -> Result<Outcome> {
    let config = load_config(config_path)?;
    tracing::info!("Checking {} device(s)", config.devices.len());

    let source = DeviceSource::new(config.ssh.clone());
    let report = run_checks(&config, &source);
    println!("{}", report.to_json(config.report.pretty)?);

    Ok(if report.passed() {
        Outcome::Passed
    } else {
        Outcome::Failed
    })
}

fn parse(file: &Path) -> Result<Outcome> {
    let states: BTreeMap<_, _> = parse_standby_brief_file(file)?.into_iter().collect();
    let json = serde_json::to_string_pretty(&states).context("Failed to serialize group states")?;
    println!("{json}");
    Ok(Outcome::Passed)
}

fn init(config_path: &Path, force: bool) -> Result<Outcome> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    Config::save_default_config(config_path)?;
    tracing::info!("Wrote default configuration to {}", config_path.display());
    Ok(Outcome::Passed)
}
