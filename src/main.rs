//! Blocksmith - a multi-locale page generator for JSON-driven blocks.

mod assets;
mod block;
mod build;
mod cli;
mod compose;
mod config;
mod error;
mod generator;
mod logger;
mod realization;
mod resolve;
mod site;
mod utils;
mod validate;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result, bail};
use build::{build_site, clean};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use generator::not_found::build_not_found;
use realization::Realization;
use std::process::ExitCode;
use utils::links::check_sites;
use validate::validate_all;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Merge { .. } => {
            site::merge(&config, &realization(&config, cli)?)?;
        }
        Commands::Split { .. } => {
            let written = site::split(&config, &realization(&config, cli)?)?;
            log!("ok"; "split into {} variant file(s)", written.len());
        }
        Commands::Build { realization, .. } => {
            build_site(&config, realization)?;
        }
        Commands::Validate => {
            let checked = validate_all(&config)?;
            log!("ok"; "all {checked} variant file(s) are valid");
        }
        Commands::Clean => {
            let removed = clean(&config)?;
            if removed > 0 {
                log!("ok"; "removed {removed} file(s)");
            }
        }
        Commands::Check => {
            let report = check_sites(&config.paths.sites)?;
            report.log();
            if !report.is_clean() {
                bail!("{} broken link(s)", report.broken_count());
            }
        }
        Commands::NotFound => {
            build_not_found(&config)?;
        }
    }
    Ok(())
}

/// Load configuration, falling back to the built-in defaults when the
/// project has no config file.
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(std::path::Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);
    if !config.config_path.is_file() {
        log!("config"; "{} not found, using defaults", config.config_path.display());
    }
    config.validate()?;

    Ok(config)
}

/// The realization named on the command line, matched against the prefix table.
fn realization(config: &SiteConfig, cli: &Cli) -> Result<Realization> {
    let name = cli
        .realization()
        .context("this command takes no realization")?;
    Ok(config.realizations.parse(name)?)
}
