//! `[layout]` section configuration.
//!
//! File names inside a single block directory.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[layout]` section in blocksmith.toml - per-block file names.
///
/// ```text
/// blocks/<block>/
///     ├── base.j2
///     ├── base.css        (optional)
///     ├── base.js         (optional)
///     ├── schema.json
///     └── realization/
///           ├── consular_ua.json
///           └── default_ua.json
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Directory holding the block's data variants.
    #[serde(default = "defaults::layout::variants")]
    #[educe(Default = defaults::layout::variants())]
    pub variants: String,

    /// Jinja template rendered for the block.
    #[serde(default = "defaults::layout::template")]
    #[educe(Default = defaults::layout::template())]
    pub template: String,

    /// Default stylesheet appended to the site bundle.
    #[serde(default = "defaults::layout::style")]
    #[educe(Default = defaults::layout::style())]
    pub style: String,

    /// Default script appended to the site bundle.
    #[serde(default = "defaults::layout::script")]
    #[educe(Default = defaults::layout::script())]
    pub script: String,

    /// JSON schema every variant must satisfy.
    #[serde(default = "defaults::layout::schema")]
    #[educe(Default = defaults::layout::schema())]
    pub schema: String,
}
