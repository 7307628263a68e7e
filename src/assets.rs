//! Site asset aggregation.
//!
//! Walks the inline-block graph from a realization's root block and
//! concatenates every visited block's default stylesheet and script into two
//! bundles. The walk is a depth-first graph traversal with a visited set keyed
//! by block name: a block is marked before its references are followed, so a
//! block reachable twice (or through a cycle) contributes exactly once, at the
//! position where it was first met.
//!
//! ```text
//! root ──► hero ──► footer
//!   │               ▲
//!   └──► contacts ──┘          order: root, hero, footer, contacts
//! ```
//!
//! The bundles are persisted to `[paths].bundles` and read back by the root
//! render, see `build::build_site`.

use crate::block::{BlockStore, VariantData};
use crate::config::{PathsConfig, SiteConfig};
use crate::error::Result;
use crate::realization::{Realization, RealizationTable};
use crate::resolve::{ResolveOptions, Resolver};
use crate::utils::fs::{read_text, write_text};
use std::collections::HashSet;
use std::path::Path;

/// Aggregated stylesheet and script text for one realization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetBundle {
    /// Visited blocks in first-encounter order.
    pub blocks: Vec<String>,
    pub style: String,
    pub script: String,
}

impl AssetBundle {
    /// Persist both bundles. Empty bundles are written as empty files so the
    /// renderer always finds its inputs.
    pub fn write(&self, paths: &PathsConfig) -> Result<()> {
        write_text(&paths.style_bundle(), &self.style)?;
        write_text(&paths.script_bundle(), &self.script)
    }
}

/// Graph walker collecting per-block assets.
pub struct AssetCollector<'a> {
    resolver: Resolver<'a>,
    table: &'a RealizationTable,
}

impl<'a> AssetCollector<'a> {
    pub const fn new(resolver: Resolver<'a>, table: &'a RealizationTable) -> Self {
        Self { resolver, table }
    }

    pub fn from_config(config: &'a SiteConfig) -> Self {
        Self::new(
            Resolver::new(BlockStore::from_config(config)),
            &config.realizations,
        )
    }

    /// Collect both bundles for the realization's root block.
    pub fn collect(&self, realization: &Realization) -> Result<AssetBundle> {
        let blocks = self.block_order(realization)?;
        let store = self.resolver.store();

        let mut styles = Vec::new();
        let mut scripts = Vec::new();
        for block in &blocks {
            if let Some(section) = read_section(block, &store.style_path(block))? {
                styles.push(section);
            }
            if let Some(section) = read_section(block, &store.script_path(block))? {
                scripts.push(section);
            }
        }

        Ok(AssetBundle {
            blocks,
            style: join_sections(&styles),
            script: join_sections(&scripts),
        })
    }

    /// Blocks reachable from the root, in first-encounter depth-first order.
    pub fn block_order(&self, realization: &Realization) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        self.visit(realization.root_block(), realization, &mut seen, &mut order)?;
        Ok(order)
    }

    fn visit(
        &self,
        block: &str,
        realization: &Realization,
        seen: &mut HashSet<String>,
        order: &mut Vec<String>,
    ) -> Result<()> {
        if !seen.insert(block.to_owned()) {
            return Ok(());
        }
        order.push(block.to_owned());

        self.resolver.store().require(block)?;
        let resolved = self
            .resolver
            .resolve(block, realization, ResolveOptions::FALLBACK)?;
        let variant = VariantData::load(resolved.path())?;

        for inline in variant.inline_refs()? {
            let nested = self.table.parse(inline.realization_or(realization.name()))?;
            self.visit(&inline.block_name, &nested, seen, order)?;
        }
        Ok(())
    }
}

/// One bundle section: a banner naming the block, then the trimmed asset.
fn read_section(block: &str, path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = read_text(path)?;
    Ok(Some(format!("\n/* ===== {block} ===== */\n{}", content.trim())))
}

fn join_sections(sections: &[String]) -> String {
    if sections.is_empty() {
        String::new()
    } else {
        sections.join("\n\n") + "\n"
    }
}

// ============================================================================
// Tests
// ============================================================================
