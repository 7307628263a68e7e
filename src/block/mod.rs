//! Block directory layout and discovery.
//!
//! Blocks are not declared anywhere: the set of valid block names is the set
//! of sub-directories of `[paths].blocks`. The core only reads from this tree.

mod variant;

pub use variant::VariantData;

use crate::config::{LayoutConfig, SiteConfig};
use crate::error::{BlockError, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Extension of variant data files.
const VARIANT_EXT: &str = "json";

/// A block name is exactly one plain path component, so it can only name a
/// direct sub-directory of the blocks tree.
pub fn is_block_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

/// Read-only view of the blocks directory.
#[derive(Debug, Clone, Copy)]
pub struct BlockStore<'a> {
    dir: &'a Path,
    layout: &'a LayoutConfig,
}

impl<'a> BlockStore<'a> {
    #[inline]
    pub const fn new(dir: &'a Path, layout: &'a LayoutConfig) -> Self {
        Self { dir, layout }
    }

    #[inline]
    pub fn from_config(config: &'a SiteConfig) -> Self {
        Self::new(&config.paths.blocks, &config.layout)
    }

    /// The blocks directory itself.
    #[inline]
    pub const fn dir(&self) -> &Path {
        self.dir
    }

    pub fn block_dir(&self, block: &str) -> PathBuf {
        self.dir.join(block)
    }

    /// Fail with `BlockNotFound` unless the block directory exists.
    pub fn require(&self, block: &str) -> Result<PathBuf> {
        let dir = self.block_dir(block);
        if is_block_name(block) && dir.is_dir() {
            Ok(dir)
        } else {
            Err(BlockError::BlockNotFound {
                name: block.to_owned(),
                dir,
            })
        }
    }

    /// All block names, sorted.
    pub fn block_names(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Err(BlockError::BlockNotFound {
                name: String::new(),
                dir: self.dir.to_path_buf(),
            });
        }

        let mut names: Vec<String> = WalkDir::new(self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| e.file_name().to_str().map(str::to_owned))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Template name as seen by the template loader (relative to the blocks dir).
    pub fn template_name(&self, block: &str) -> String {
        format!("{block}/{}", self.layout.template)
    }

    pub fn template_path(&self, block: &str) -> PathBuf {
        self.block_dir(block).join(&self.layout.template)
    }

    pub fn style_path(&self, block: &str) -> PathBuf {
        self.block_dir(block).join(&self.layout.style)
    }

    pub fn script_path(&self, block: &str) -> PathBuf {
        self.block_dir(block).join(&self.layout.script)
    }

    pub fn schema_path(&self, block: &str) -> PathBuf {
        self.block_dir(block).join(&self.layout.schema)
    }

    pub fn variants_dir(&self, block: &str) -> PathBuf {
        self.block_dir(block).join(&self.layout.variants)
    }

    /// Path of the variant file `<stem>.json`, whether or not it exists.
    pub fn variant_path(&self, block: &str, stem: &str) -> PathBuf {
        self.variants_dir(block).join(format!("{stem}.{VARIANT_EXT}"))
    }

    /// Every variant file of a block, sorted. A block without a variants
    /// directory has none.
    pub fn variant_files(&self, block: &str) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(self.variants_dir(block))
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|p| p.extension().is_some_and(|ext| ext == VARIANT_EXT))
            .collect();
        files.sort();
        files
    }
}

// ============================================================================
// Tests
// ============================================================================
