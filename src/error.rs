//! Error types for resolution, composition and validation.

use crate::validate::ValidationFailure;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T, E = BlockError> = std::result::Result<T, E>;

/// Failures of the block pipeline. Every variant aborts the current command.
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("realization `{name}` matches no configured prefix (known: {known})")]
    UnknownRealizationPrefix { name: String, known: String },

    #[error("variant not found: {}", attempted(.exact, .default.as_deref()))]
    VariantNotFound {
        exact: PathBuf,
        default: Option<PathBuf>,
    },

    #[error("invalid variant `{}`: {reason}", .path.display())]
    InvalidVariant { path: PathBuf, reason: String },

    #[error("inline_block[{index}] in `{}` {reason}", .path.display())]
    MalformedInlineRef {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    #[error("cyclic inline_block reference: {}", .chain.join(" -> "))]
    CyclicInlineReference { chain: Vec<String> },

    #[error("block not found: `{name}` (no directory {})", .dir.display())]
    BlockNotFound { name: String, dir: PathBuf },

    #[error("template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("{0}")]
    SchemaViolation(Box<ValidationFailure>),

    #[error("unusable schema `{}`: {reason}", .path.display())]
    Schema { path: PathBuf, reason: String },

    #[error("failed to access `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in `{}`", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to render block `{block}`")]
    Render {
        block: String,
        #[source]
        source: minijinja::Error,
    },
}

impl BlockError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Render the list of paths a resolution attempted.
fn attempted(exact: &Path, default: Option<&Path>) -> String {
    match default {
        Some(default) => format!("{} and {}", exact.display(), default.display()),
        None => exact.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_not_found_names_both_paths() {
        let err = BlockError::VariantNotFound {
            exact: PathBuf::from("blocks/footer/realization/consular_ua.json"),
            default: Some(PathBuf::from("blocks/footer/realization/default_ua.json")),
        };
        let display = format!("{err}");
        assert!(display.contains("consular_ua.json"));
        assert!(display.contains("default_ua.json"));
    }

    #[test]
    fn test_variant_not_found_exact_only() {
        let err = BlockError::VariantNotFound {
            exact: PathBuf::from("blocks/footer/realization/consular_ua.json"),
            default: None,
        };
        assert_eq!(
            format!("{err}"),
            "variant not found: blocks/footer/realization/consular_ua.json"
        );
    }

    #[test]
    fn test_cycle_display() {
        let err = BlockError::CyclicInlineReference {
            chain: vec!["hero".into(), "footer".into(), "hero".into()],
        };
        assert_eq!(
            format!("{err}"),
            "cyclic inline_block reference: hero -> footer -> hero"
        );
    }

    #[test]
    fn test_malformed_inline_ref_display() {
        let err = BlockError::MalformedInlineRef {
            path: PathBuf::from("hero.json"),
            index: 2,
            reason: "must contain block_name".into(),
        };
        assert_eq!(
            format!("{err}"),
            "inline_block[2] in `hero.json` must contain block_name"
        );
    }
}
