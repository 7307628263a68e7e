//! Site configuration management for `blocksmith.toml`.
//!
//! # Sections
//!
//! | Section            | Purpose                                        |
//! |--------------------|------------------------------------------------|
//! | `[paths]`          | Block, output, backbone, schema, bundle dirs   |
//! | `[layout]`         | File names inside a block directory            |
//! | `[build]`          | Minification, 404 page, clean policy           |
//! | `[[realizations]]` | Ordered prefix → root block table              |
//!
//! # Example
//!
//! ```toml
//! [paths]
//! blocks = "blocks"
//! sites = "sites"
//!
//! [build]
//! minify = true
//!
//! [[realizations]]
//! prefix = "consular_"
//! root_block = "template_consular_container"
//! ```
//!
//! Every field has a default, so a project without a config file builds with
//! the conventional layout.

mod build;
pub mod defaults;
mod error;
mod layout;
mod paths;

pub use build::BuildConfig;
pub use error::ConfigError;
pub use layout::LayoutConfig;
pub use paths::PathsConfig;

use crate::block::is_block_name;
use crate::cli::{Cli, Commands};
use crate::realization::RealizationTable;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing blocksmith.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Project root (set from CLI, all paths are relative to it)
    #[serde(skip)]
    #[educe(Default = PathBuf::from("./"))]
    pub root: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory settings
    #[serde(default)]
    pub paths: PathsConfig,

    /// Block directory layout
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Realization prefix table, evaluated in order
    #[serde(default = "defaults::realizations::table")]
    #[educe(Default = defaults::realizations::table())]
    pub realizations: RealizationTable,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli.root.clone().unwrap_or_else(|| self.root.clone());
        self.update_path_with_root(&root);
        self.config_path = Self::normalize_path(&self.root.join(&cli.config));

        if let Commands::Build { minify, .. } = &cli.command {
            Self::update_option(&mut self.build.minify, minify.as_ref());
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve every configured path against `root` and normalize to absolute paths
    pub fn update_path_with_root(&mut self, root: &Path) {
        let root = Self::normalize_path(root);

        self.paths.blocks = Self::normalize_path(&root.join(&self.paths.blocks));
        self.paths.sites = Self::normalize_path(&root.join(&self.paths.sites));
        self.paths.backbone = Self::normalize_path(&root.join(&self.paths.backbone));
        self.paths.schemas = Self::normalize_path(&root.join(&self.paths.schemas));
        self.paths.bundles = Self::normalize_path(&root.join(&self.paths.bundles));
        self.build.not_found = Self::normalize_path(&root.join(&self.build.not_found));

        self.root = root;
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        let rules = self.realizations.rules();
        if rules.is_empty() {
            bail!(ConfigError::Validation(
                "[[realizations]] must contain at least one rule".into()
            ));
        }

        let mut seen = HashSet::new();
        for rule in rules {
            if rule.prefix.is_empty() {
                bail!(ConfigError::Validation(format!(
                    "[[realizations]] rule for `{}` has an empty prefix",
                    rule.root_block
                )));
            }
            if !is_block_name(&rule.root_block) {
                bail!(ConfigError::Validation(format!(
                    "[[realizations]] prefix `{}` needs a root_block that names one block directory, got `{}`",
                    rule.prefix, rule.root_block
                )));
            }
            if !seen.insert(rule.prefix.as_str()) {
                bail!(ConfigError::Validation(format!(
                    "[[realizations]] prefix `{}` is declared twice",
                    rule.prefix
                )));
            }
        }

        if self.layout.variants.is_empty() || self.layout.template.is_empty() {
            bail!(ConfigError::Validation(
                "[layout.variants] and [layout.template] must not be empty".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
