//! Site documents: every block's variant for one realization in one file.
//!
//! ```text
//! merge:  blocks/*/realization/<name>.json ──► json_backbone/<name>.json
//! split:  json_backbone/<name>.json ──► blocks/*/realization/<name>.json
//! ```
//!
//! Only exact variants take part. Merging skips blocks that have none, and no
//! locale default is ever copied into a site document.

use crate::block::{BlockStore, VariantData};
use crate::config::SiteConfig;
use crate::error::{BlockError, Result};
use crate::log;
use crate::realization::Realization;
use crate::resolve::{ResolveOptions, Resolver};
use crate::utils::fs::{read_text, to_pretty_json, write_text};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDocument {
    pub meta: SiteMeta,
    #[serde(default)]
    pub blocks: BTreeMap<String, BlockEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteMeta {
    #[serde(rename = "realizationName", alias = "realization_name")]
    pub realization_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEntry {
    pub realization: Value,
}

impl SiteDocument {
    pub fn new(realization: &str) -> Self {
        Self {
            meta: SiteMeta {
                realization_name: realization.to_owned(),
            },
            blocks: BTreeMap::new(),
        }
    }
}

/// Collect every block's exact variant into the realization's site document.
pub fn merge(config: &SiteConfig, realization: &Realization) -> Result<PathBuf> {
    let store = BlockStore::from_config(config);
    let resolver = Resolver::new(store);
    let mut document = SiteDocument::new(realization.name());

    for block in store.block_names()? {
        let path = match resolver.resolve(&block, realization, ResolveOptions::EXACT) {
            Ok(resolved) => resolved.into_path(),
            Err(BlockError::VariantNotFound { .. }) => continue,
            Err(err) => return Err(err),
        };
        let variant = VariantData::load(&path)?;
        document.blocks.insert(
            block,
            BlockEntry {
                realization: variant.into_value(),
            },
        );
    }

    let out = config.paths.site_document(realization.name());
    let value = serde_json::to_value(&document).map_err(|err| BlockError::json(&out, err))?;
    write_text(&out, &to_pretty_json(&value))?;
    log!("merge"; "{} block(s) into {}", document.blocks.len(), out.display());
    Ok(out)
}

/// Write each block of the realization's site document back to its variant
/// file. Returns the files written.
pub fn split(config: &SiteConfig, realization: &Realization) -> Result<Vec<PathBuf>> {
    let source = config.paths.site_document(realization.name());
    let text = read_text(&source)?;
    let document: SiteDocument =
        serde_json::from_str(&text).map_err(|err| BlockError::json(&source, err))?;

    let store = BlockStore::from_config(config);
    let resolver = Resolver::new(store);
    let mut written = Vec::with_capacity(document.blocks.len());

    for (block, entry) in document.blocks {
        store.require(&block)?;
        let out = resolver
            .resolve(&block, realization, ResolveOptions::BEST_EFFORT)?
            .into_path();
        // reject non-object data before it reaches the blocks tree
        let variant = VariantData::from_value(&out, entry.realization)?;
        write_text(&out, &to_pretty_json(&variant.into_value()))?;
        log!("split"; "wrote {}", out.display());
        written.push(out);
    }
    Ok(written)
}
