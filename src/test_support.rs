//! On-disk project fixtures for unit tests.

use crate::config::SiteConfig;
use crate::realization::Realization;
use crate::utils::fs::to_pretty_json;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway project root with a default config pointing into it.
pub struct Fixture {
    _dir: TempDir,
    pub config: SiteConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.update_path_with_root(dir.path());
        fs::create_dir_all(&config.paths.blocks).unwrap();
        Self { _dir: dir, config }
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn realization(&self, name: &str) -> Realization {
        self.config.realizations.parse(name).unwrap()
    }

    fn block_file(&self, block: &str, file: &str, content: &str) -> PathBuf {
        let path = self.config.paths.blocks.join(block).join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Write `<block>/realization/<stem>.json` pretty-printed.
    pub fn variant(&self, block: &str, stem: &str, value: Value) -> PathBuf {
        self.variant_raw(block, stem, &to_pretty_json(&value))
    }

    pub fn variant_raw(&self, block: &str, stem: &str, text: &str) -> PathBuf {
        let file = format!("{}/{stem}.json", self.config.layout.variants);
        self.block_file(block, &file, text)
    }

    pub fn template(&self, block: &str, source: &str) -> PathBuf {
        self.block_file(block, &self.config.layout.template.clone(), source)
    }

    pub fn style(&self, block: &str, css: &str) -> PathBuf {
        self.block_file(block, &self.config.layout.style.clone(), css)
    }

    pub fn script(&self, block: &str, js: &str) -> PathBuf {
        self.block_file(block, &self.config.layout.script.clone(), js)
    }

    pub fn schema(&self, block: &str, schema: Value) -> PathBuf {
        self.block_file(block, &self.config.layout.schema.clone(), &to_pretty_json(&schema))
    }
}
