//! `[paths]` section configuration.
//!
//! Single source of truth for every directory and well-known file the
//! pipeline reads or writes.
//!
//! ```text
//! PathsConfig
//!     │
//!     ├── blocks                  → /abs/root/blocks
//!     ├── site_document("x")      → /abs/root/json_backbone/x.json
//!     ├── output_page("x")        → /abs/root/sites/x.html
//!     ├── style_bundle()          → /abs/root/.bundle/site.css
//!     └── script_bundle()         → /abs/root/.bundle/site.js
//! ```

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the aggregated stylesheet bundle.
const STYLE_BUNDLE: &str = "site.css";
/// File name of the aggregated script bundle.
const SCRIPT_BUNDLE: &str = "site.js";

/// `[paths]` section in blocksmith.toml.
///
/// # Example
/// ```toml
/// [paths]
/// blocks = "blocks"
/// sites = "public"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory holding one sub-directory per block.
    #[serde(default = "defaults::paths::blocks")]
    #[educe(Default = defaults::paths::blocks())]
    pub blocks: PathBuf,

    /// Rendered pages, one `<realization>.html` per build.
    #[serde(default = "defaults::paths::sites")]
    #[educe(Default = defaults::paths::sites())]
    pub sites: PathBuf,

    /// Site documents produced by `merge` and consumed by `split`.
    #[serde(default = "defaults::paths::backbone")]
    #[educe(Default = defaults::paths::backbone())]
    pub backbone: PathBuf,

    /// Shared `*.schema.json` files available to `$ref`.
    #[serde(default = "defaults::paths::schemas")]
    #[educe(Default = defaults::paths::schemas())]
    pub schemas: PathBuf,

    /// Where the aggregated style/script bundles are handed to the renderer.
    #[serde(default = "defaults::paths::bundles")]
    #[educe(Default = defaults::paths::bundles())]
    pub bundles: PathBuf,
}

impl PathsConfig {
    /// Site document path for a realization.
    pub fn site_document(&self, realization: &str) -> PathBuf {
        self.backbone.join(format!("{realization}.json"))
    }

    /// Rendered page path for a realization.
    pub fn output_page(&self, realization: &str) -> PathBuf {
        self.sites.join(format!("{realization}.html"))
    }

    pub fn style_bundle(&self) -> PathBuf {
        self.bundles.join(STYLE_BUNDLE)
    }

    pub fn script_bundle(&self) -> PathBuf {
        self.bundles.join(SCRIPT_BUNDLE)
    }
}
