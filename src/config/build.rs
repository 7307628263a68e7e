//! `[build]` section configuration.
//!
//! Contains output post-processing and housekeeping settings.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in blocksmith.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// minify = true
/// not_found = "404.html"
/// keep_prefixes = ["default_", "test_"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Minify rendered HTML.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub minify: bool,

    /// Location of the generated 404 page.
    #[serde(default = "defaults::build::not_found")]
    #[educe(Default = defaults::build::not_found())]
    pub not_found: PathBuf,

    /// Variant file name prefixes that `clean` never removes.
    #[serde(default = "defaults::build::keep_prefixes")]
    #[educe(Default = defaults::build::keep_prefixes())]
    pub keep_prefixes: Vec<String>,
}

impl BuildConfig {
    /// Whether a variant file survives `clean`.
    pub fn keeps(&self, file_name: &str) -> bool {
        self.keep_prefixes
            .iter()
            .any(|prefix| file_name.starts_with(prefix.as_str()))
    }
}
