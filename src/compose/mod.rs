//! Recursive block composition.
//!
//! Rendering a block renders every block its variant references through
//! `inline_block` first, then hands the fragments to the block's template:
//!
//! ```text
//! render(root, consular_ua, ROOT)
//!     │
//!     ├── resolve variant (exact, else default_ua)
//!     ├── inline_block["include_css"] ◄── site.css bundle
//!     ├── inline_block["include_js"]  ◄── site.js bundle
//!     ├── for each inline ref, in order:
//!     │       inline_block[name] ◄── render(name, ref realization or parent's)
//!     └── template(content = variant, inline_block)
//! ```
//!
//! A block already on the current render path is a cycle and fails with
//! `CyclicInlineReference`. Nothing is written to disk here.

mod template;

pub use template::TemplateEngine;

use crate::block::{BlockStore, VariantData};
use crate::config::{PathsConfig, SiteConfig};
use crate::error::{BlockError, Result};
use crate::realization::{Realization, RealizationTable};
use crate::resolve::{ResolveOptions, Resolver};
use crate::utils::fs::read_text;
use std::collections::BTreeMap;

/// `inline_block` key holding the aggregated stylesheet at the root.
pub const INCLUDE_CSS: &str = "include_css";
/// `inline_block` key holding the aggregated script at the root.
pub const INCLUDE_JS: &str = "include_js";

/// Which aggregated bundles to inject. Set by the caller for the outermost
/// render only; nested renders never inject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub include_style: bool,
    pub include_script: bool,
}

impl RenderOptions {
    pub const ROOT: Self = Self {
        include_style: true,
        include_script: true,
    };

    pub const NESTED: Self = Self {
        include_style: false,
        include_script: false,
    };
}

pub struct Composer<'a> {
    resolver: Resolver<'a>,
    table: &'a RealizationTable,
    paths: &'a PathsConfig,
    engine: TemplateEngine,
}

impl<'a> Composer<'a> {
    pub fn from_config(config: &'a SiteConfig) -> Self {
        let store = BlockStore::from_config(config);
        Self {
            resolver: Resolver::new(store),
            table: &config.realizations,
            paths: &config.paths,
            engine: TemplateEngine::new(store.dir()),
        }
    }

    /// Render `block` for `realization`, recursively expanding inline blocks.
    pub fn render(
        &self,
        block: &str,
        realization: &Realization,
        options: RenderOptions,
    ) -> Result<String> {
        let mut path = Vec::new();
        self.render_on_path(block, realization, options, &mut path)
    }

    fn render_on_path(
        &self,
        block: &str,
        realization: &Realization,
        options: RenderOptions,
        path: &mut Vec<String>,
    ) -> Result<String> {
        if path.iter().any(|visited| visited == block) {
            let mut chain = path.clone();
            chain.push(block.to_owned());
            return Err(BlockError::CyclicInlineReference { chain });
        }

        let store = self.resolver.store();
        store.require(block)?;
        let resolved = self
            .resolver
            .resolve(block, realization, ResolveOptions::FALLBACK)?;
        let template_path = store.template_path(block);
        if !template_path.is_file() {
            return Err(BlockError::TemplateNotFound(template_path));
        }
        let variant = VariantData::load(resolved.path())?;

        let mut inline_block = BTreeMap::new();
        if options.include_style {
            inline_block.insert(INCLUDE_CSS.to_owned(), read_text(&self.paths.style_bundle())?);
        }
        if options.include_script {
            inline_block.insert(INCLUDE_JS.to_owned(), read_text(&self.paths.script_bundle())?);
        }

        path.push(block.to_owned());
        for (index, inline) in variant.inline_refs()?.into_iter().enumerate() {
            if is_reserved(&inline.block_name) {
                return Err(BlockError::MalformedInlineRef {
                    path: variant.path().to_path_buf(),
                    index,
                    reason: format!("uses reserved block_name `{}`", inline.block_name),
                });
            }
            let nested = self.table.parse(inline.realization_or(realization.name()))?;
            let html = self.render_on_path(&inline.block_name, &nested, RenderOptions::NESTED, path)?;
            inline_block.insert(inline.block_name, html);
        }
        path.pop();

        self.engine
            .render(&store.template_name(block), variant.data(), &inline_block)
            .map_err(|source| BlockError::Render {
                block: block.to_owned(),
                source,
            })
    }
}

fn is_reserved(block_name: &str) -> bool {
    block_name == INCLUDE_CSS || block_name == INCLUDE_JS
}

// ============================================================================
// Tests
// ============================================================================
