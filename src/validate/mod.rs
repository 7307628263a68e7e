//! Schema validation of block variants.
//!
//! Every variant of every block is checked against the block's schema. Both
//! levels are fail-fast: a file reports only its first violation, and the
//! batch stops at the first invalid file.
//!
//! ```text
//! validate_all
//!     │
//!     ├── blocks (sorted)
//!     │     └── variants (sorted)
//!     │           ├── valid   → "[validate] ok <file>"
//!     │           └── invalid → SchemaViolation(ValidationFailure), stop
//!     └── Ok(files checked)
//! ```

mod locate;
mod schema;

pub use locate::{json_path_to_line, render_context};
pub use schema::{PathSegment, SchemaValidator, SharedSchemas, Violation, dotted};

use crate::block::BlockStore;
use crate::config::SiteConfig;
use crate::error::{BlockError, Result};
use crate::log;
use crate::utils::fs::read_text;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// Lines shown either side of the offending line.
const CONTEXT_RADIUS: usize = 4;

/// Human-oriented report of a file's first violation.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    pub file: PathBuf,
    /// Offending path, extended with the extra key for additional properties.
    pub path: Vec<PathSegment>,
    /// 0-based line in the pretty-printed file, when the path could be replayed.
    pub line: Option<usize>,
    pub hint: String,
    /// Numbered source lines around `line`.
    pub context: Option<String>,
}

impl ValidationFailure {
    fn new(file: &Path, text: &str, document: &Value, violation: &Violation) -> Self {
        let path = violation.line_path();
        let line = json_path_to_line(document, &path);
        let context = line.map(|line| render_context(text, line, CONTEXT_RADIUS));

        Self {
            file: file.to_path_buf(),
            hint: hint(violation, path.last()),
            path,
            line,
            context,
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema violation in {}", self.file.display())?;
        if !self.path.is_empty() {
            write!(f, "\nProblem at: {}", dotted(&self.path))?;
            if let Some(line) = self.line {
                write!(f, " (line {})", line + 1)?;
            }
        }
        if let Some(context) = &self.context {
            write!(f, "\nContext:\n{}", context.trim_end())?;
        }
        write!(f, "\nWhat to do: {}", self.hint)
    }
}

/// Remediation text for a violation.
fn hint(violation: &Violation, last: Option<&PathSegment>) -> String {
    if violation.keyword != "type" {
        return format!(
            "Validator type '{}'. Fix this value according to the expected format.",
            violation.keyword
        );
    }

    let expected = match &violation.expected {
        Some(Value::String(name)) => name.clone(),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" or "),
        Some(other) => other.to_string(),
        None => "value of the expected type".to_owned(),
    };
    match last {
        Some(PathSegment::Key(key)) => format!(
            "Replace this value with a {expected}.\nExample: \"{key}\": \"<{expected}>\""
        ),
        _ => format!("Replace this value with a {expected}."),
    }
}

/// Check one variant file. `Ok(None)` means the file is valid.
pub fn validate_variant(
    validator: &SchemaValidator,
    variant: &Path,
) -> Result<Option<ValidationFailure>> {
    let text = read_text(variant)?;
    let document: Value =
        serde_json::from_str(&text).map_err(|err| BlockError::json(variant, err))?;

    Ok(validator
        .first_violation(&document)
        .map(|violation| ValidationFailure::new(variant, &text, &document, &violation)))
}

/// Validate every variant of every block, stopping at the first invalid file.
/// Returns the number of files checked.
pub fn validate_all(config: &SiteConfig) -> Result<usize> {
    let shared = SharedSchemas::load(&config.paths.schemas)?;
    log!("validate"; "{} shared schema(s) from {}", shared.count(), config.paths.schemas.display());

    let store = BlockStore::from_config(config);
    let mut checked = 0;

    for block in store.block_names()? {
        let variants = store.variant_files(&block);
        if variants.is_empty() {
            continue;
        }
        let validator = SchemaValidator::load(&store.schema_path(&block), &shared)?;

        for variant in variants {
            if let Some(failure) = validate_variant(&validator, &variant)? {
                log!("invalid"; "{}", variant.display());
                return Err(BlockError::SchemaViolation(Box::new(failure)));
            }
            log!("validate"; "ok {}", variant.display());
            checked += 1;
        }
    }

    Ok(checked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use serde_json::json;

    fn title_schema() -> Value {
        json!({
            "type": "object",
            "properties": {"title": {"type": "string"}},
            "additionalProperties": false
        })
    }

    #[test]
    fn test_wrong_type_reports_line_and_hint() {
        let fx = Fixture::new();
        let schema = fx.schema("hero", title_schema());
        let variant = fx.variant_raw("hero", "consular_ua", "{\"title\": 5}\n");
        let validator = SchemaValidator::load(&schema, &SharedSchemas::default()).unwrap();

        let failure = validate_variant(&validator, &variant).unwrap().unwrap();
        assert_eq!(failure.path, vec![PathSegment::Key("title".into())]);
        assert_eq!(failure.line, Some(1));
        assert!(failure.hint.starts_with("Replace this value with a string"));
        assert!(failure.hint.contains("\"title\": \"<string>\""));
    }

    #[test]
    fn test_pretty_file_context_points_at_key() {
        let fx = Fixture::new();
        let schema = fx.schema("hero", title_schema());
        let variant = fx.variant("hero", "consular_ua", json!({"title": 5}));
        let validator = SchemaValidator::load(&schema, &SharedSchemas::default()).unwrap();

        let failure = validate_variant(&validator, &variant).unwrap().unwrap();
        let context = failure.context.unwrap();
        assert!(context.contains(">    2 |   \"title\": 5"));
    }

    #[test]
    fn test_extra_key_is_located() {
        let fx = Fixture::new();
        let schema = fx.schema("hero", title_schema());
        let variant = fx.variant("hero", "consular_ua", json!({"title": "x", "subtitle": "y"}));
        let validator = SchemaValidator::load(&schema, &SharedSchemas::default()).unwrap();

        let failure = validate_variant(&validator, &variant).unwrap().unwrap();
        assert_eq!(failure.path, vec![PathSegment::Key("subtitle".into())]);
        assert_eq!(failure.line, Some(2));
        assert!(failure.hint.contains("'additionalProperties'"));
        assert!(format!("{failure}").contains("Problem at: subtitle (line 3)"));
    }

    #[test]
    fn test_valid_file() {
        let fx = Fixture::new();
        let schema = fx.schema("hero", title_schema());
        let variant = fx.variant("hero", "default_ua", json!({"title": "x"}));
        let validator = SchemaValidator::load(&schema, &SharedSchemas::default()).unwrap();

        assert!(validate_variant(&validator, &variant).unwrap().is_none());
    }

    #[test]
    fn test_validate_all_stops_at_first_invalid() {
        let fx = Fixture::new();
        fx.schema("footer", title_schema());
        fx.variant("footer", "consular_ua", json!({"title": "ok"}));
        fx.schema("hero", title_schema());
        fx.variant("hero", "consular_en", json!({"title": []}));
        fx.variant("hero", "consular_ua", json!({"title": 5}));

        let err = validate_all(&fx.config).unwrap_err();
        match err {
            BlockError::SchemaViolation(failure) => {
                assert!(failure.file.ends_with("hero/realization/consular_en.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_all_counts_files() {
        let fx = Fixture::new();
        fx.schema("footer", title_schema());
        fx.variant("footer", "consular_ua", json!({"title": "ok"}));
        fx.variant("footer", "default_ua", json!({}));
        // a block without variants needs no schema
        fx.template("icon", "<svg/>");

        assert_eq!(validate_all(&fx.config).unwrap(), 2);
    }

    #[test]
    fn test_shared_schema_from_config() {
        let fx = Fixture::new();
        crate::utils::fs::write_text(
            &fx.config.paths.schemas.join("inline_block.schema.json"),
            r#"{"type": "array", "items": {"type": "object", "required": ["block_name"]}}"#,
        )
        .unwrap();
        fx.schema(
            "hero",
            json!({"type": "object", "properties": {"inline_block": {"$ref": "inline_block.schema.json"}}}),
        );
        fx.variant("hero", "consular_ua", json!({"inline_block": [{"block_name": "footer"}]}));

        assert_eq!(validate_all(&fx.config).unwrap(), 1);
    }

    #[test]
    fn test_invalid_json_is_not_a_violation() {
        let fx = Fixture::new();
        fx.schema("hero", title_schema());
        fx.variant_raw("hero", "consular_ua", "{ broken");

        assert!(matches!(
            validate_all(&fx.config),
            Err(BlockError::Json { .. })
        ));
    }

    #[test]
    fn test_index_path_hint_has_no_example() {
        let violation = Violation {
            path: vec![PathSegment::Key("items".into()), PathSegment::Index(0)],
            keyword: "type".into(),
            expected: Some(json!(["string", "null"])),
            unexpected: None,
            message: String::new(),
        };
        assert_eq!(
            hint(&violation, violation.path.last()),
            "Replace this value with a string or null."
        );
    }
}
