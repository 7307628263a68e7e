//! Realization resolver: which variant file backs a (block, realization) pair.
//!
//! ```text
//! resolve(block, realization)
//!     │
//!     ├── <block>/<variants>/<realization>.json exists ──► Exact
//!     │
//!     ├── fallback disallowed ──────────────────────────► VariantNotFound(exact)
//!     │
//!     ├── <block>/<variants>/default_<lang>.json exists ─► Default
//!     │
//!     └── otherwise ─────────────────────────────────────► VariantNotFound(exact, default)
//! ```
//!
//! The exact file always wins; a malformed exact file is reported by whoever
//! parses it, it never triggers the fallback.

use crate::block::BlockStore;
use crate::error::{BlockError, Result};
use crate::realization::Realization;
use std::path::{Path, PathBuf};

/// Resolution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// When false, the exact path is returned without looking at the disk.
    pub require_exists: bool,
    /// Consult `default_<lang>` when the exact variant is missing.
    pub allow_default_fallback: bool,
}

impl ResolveOptions {
    /// Exact path only, existence not checked (split targets).
    pub const BEST_EFFORT: Self = Self {
        require_exists: false,
        allow_default_fallback: false,
    };

    /// Exact file must exist (merge skips blocks without one).
    pub const EXACT: Self = Self {
        require_exists: true,
        allow_default_fallback: false,
    };

    /// Exact file, else the locale default. Used by rendering and asset collection.
    pub const FALLBACK: Self = Self {
        require_exists: true,
        allow_default_fallback: true,
    };
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Exact(PathBuf),
    Default(PathBuf),
}

impl Resolved {
    pub fn path(&self) -> &Path {
        match self {
            Self::Exact(path) | Self::Default(path) => path,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            Self::Exact(path) | Self::Default(path) => path,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: BlockStore<'a>,
}

impl<'a> Resolver<'a> {
    pub const fn new(store: BlockStore<'a>) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &BlockStore<'a> {
        &self.store
    }

    /// Find the variant file for `block` under `realization`.
    pub fn resolve(
        &self,
        block: &str,
        realization: &Realization,
        options: ResolveOptions,
    ) -> Result<Resolved> {
        let exact = self.store.variant_path(block, realization.name());

        if !options.require_exists || exact.is_file() {
            return Ok(Resolved::Exact(exact));
        }

        if !options.allow_default_fallback {
            return Err(BlockError::VariantNotFound {
                exact,
                default: None,
            });
        }

        let default = self
            .store
            .variant_path(block, &realization.default_variant());
        if default.is_file() {
            Ok(Resolved::Default(default))
        } else {
            Err(BlockError::VariantNotFound {
                exact,
                default: Some(default),
            })
        }
    }
}
