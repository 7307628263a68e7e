//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Blocksmith page generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to root (default: blocksmith.toml)
    #[arg(short = 'C', long, default_value = "blocksmith.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Merge every block's variant for a realization into one site document
    Merge {
        /// Realization name (e.g. consular_ua)
        realization: String,
    },

    /// Split a site document back into per-block variant files
    Split {
        /// Realization name
        realization: String,
    },

    /// Collect site assets and render the realization's root block
    Build {
        /// Realization name
        realization: String,

        /// Minify the rendered html
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        minify: Option<bool>,
    },

    /// Validate every block variant against its block schema
    Validate,

    /// Remove asset bundles and generated variant files
    Clean,

    /// Scan rendered pages for broken relative asset links
    Check,

    /// Generate the 404 page listing every rendered page
    NotFound,
}

impl Cli {
    /// Realization named by the subcommand, if it takes one.
    pub fn realization(&self) -> Option<&str> {
        match &self.command {
            Commands::Merge { realization }
            | Commands::Split { realization }
            | Commands::Build { realization, .. } => Some(realization),
            _ => None,
        }
    }
}
