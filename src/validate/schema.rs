//! Adapter over the `jsonschema` crate.
//!
//! Compiles a block schema once and reports its first violation as a
//! [`Violation`] with a typed instance path. Shared `*.schema.json` files are
//! served to `$ref` from memory, keyed by file name, so no reference ever
//! reaches the network.

use crate::error::{BlockError, Result};
use crate::utils::fs::read_text;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Retrieve, Uri, Validator};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Suffix of shared schema files.
const SHARED_SUFFIX: &str = ".schema.json";

static UNEXPECTED_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\('([^']+)' was unexpected\)").unwrap());

static EXPECTED_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"is not of types? (.+)$"#).unwrap());

// ============================================================================
// Instance paths
// ============================================================================

/// One step from a JSON value into a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Dotted rendering of a path: `items.0.title`.
pub fn dotted(path: &[PathSegment]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a JSON pointer into segments. Whether a token is an array index is
/// decided by the shape of `document` along the way.
pub fn parse_pointer(pointer: &str, document: &Value) -> Vec<PathSegment> {
    let mut node = Some(document);
    let mut path = Vec::new();

    for token in pointer.split('/').skip(1) {
        let token = token.replace("~1", "/").replace("~0", "~");
        let segment = match (node, token.parse::<usize>()) {
            (Some(Value::Array(_)), Ok(index)) => PathSegment::Index(index),
            _ => PathSegment::Key(token),
        };
        node = node.and_then(|value| match &segment {
            PathSegment::Index(index) => value.get(*index),
            PathSegment::Key(key) => value.get(key.as_str()),
        });
        path.push(segment);
    }
    path
}

// ============================================================================
// Shared schemas
// ============================================================================

/// In-memory `$ref` target set, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct SharedSchemas {
    by_name: HashMap<String, Value>,
}

impl SharedSchemas {
    /// Load every `*.schema.json` directly under `dir`. A missing directory
    /// yields an empty set.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut by_name = HashMap::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !name.ends_with(SHARED_SUFFIX) {
                continue;
            }
            by_name.insert(name.to_owned(), load_json(entry.path())?);
        }
        Ok(Self { by_name })
    }

    pub fn count(&self) -> usize {
        self.by_name.len()
    }
}

impl Retrieve for SharedSchemas {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> std::result::Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri = uri.as_str();
        let name = uri.rsplit('/').next().unwrap_or(uri);
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| format!("schema `{name}` is not a shared schema").into())
    }
}

fn load_json(path: &Path) -> Result<Value> {
    serde_json::from_str(&read_text(path)?).map_err(|err| BlockError::json(path, err))
}

// ============================================================================
// Validator
// ============================================================================

/// First violation of a document, in terms the locator and hint need.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Instance path of the offending value.
    pub path: Vec<PathSegment>,
    /// Failing schema keyword (`type`, `required`, `additionalProperties`, ...).
    pub keyword: String,
    /// Schema value of the failing keyword, e.g. `"string"` for `type`.
    pub expected: Option<Value>,
    /// First extra key of an `additionalProperties` violation.
    pub unexpected: Option<String>,
    pub message: String,
}

impl Violation {
    /// Path to the exact offending line: for an extra property this is the
    /// extra key itself, not the object holding it.
    pub fn line_path(&self) -> Vec<PathSegment> {
        let mut path = self.path.clone();
        if let Some(key) = &self.unexpected {
            path.push(PathSegment::Key(key.clone()));
        }
        path
    }
}

/// A compiled block schema.
pub struct SchemaValidator {
    schema: Value,
    validator: Validator,
}

impl SchemaValidator {
    /// Compile the schema at `path` (Draft 2020-12).
    pub fn load(path: &Path, shared: &SharedSchemas) -> Result<Self> {
        let schema = load_json(path)?;
        Self::compile(path, schema, shared)
    }

    pub fn compile(path: &Path, schema: Value, shared: &SharedSchemas) -> Result<Self> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        opts.with_retriever(shared.clone());
        let validator = opts.build(&schema).map_err(|err| BlockError::Schema {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Ok(Self { schema, validator })
    }

    /// The first reported violation, if any.
    pub fn first_violation(&self, instance: &Value) -> Option<Violation> {
        let error = self.validator.iter_errors(instance).next()?;

        let schema_path = error.schema_path.to_string();
        let keyword = schema_path
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_owned();
        let message = error.to_string();
        let instance_path = error.instance_path.to_string();

        let unexpected = match &error.kind {
            ValidationErrorKind::AdditionalProperties { unexpected } => unexpected.first().cloned(),
            _ => None,
        }
        .or_else(|| {
            (keyword == "additionalProperties")
                .then(|| UNEXPECTED_KEY.captures(&message))
                .flatten()
                .map(|caps| caps[1].to_owned())
        })
        .or_else(|| {
            (keyword == "additionalProperties")
                .then(|| self.first_undeclared_key(&schema_path, &instance_path, instance))
                .flatten()
        });

        let expected = self.schema.pointer(&schema_path).cloned().or_else(|| {
            (keyword == "type")
                .then(|| EXPECTED_TYPE.captures(&message))
                .flatten()
                .map(|caps| Value::String(caps[1].trim_matches('"').to_owned()))
        });

        Some(Violation {
            path: parse_pointer(&instance_path, instance),
            keyword,
            expected,
            unexpected,
            message,
        })
    }

    /// First key of the object at `instance_path` that its schema neither
    /// declares in `properties` nor matches through `patternProperties`.
    /// Covers `additionalProperties: false`, which reports the object only.
    fn first_undeclared_key(
        &self,
        schema_path: &str,
        instance_path: &str,
        instance: &Value,
    ) -> Option<String> {
        let (parent, _) = schema_path.rsplit_once('/')?;
        let parent = self.schema.pointer(parent)?;
        let object = instance.pointer(instance_path)?.as_object()?;

        let declared = parent.get("properties").and_then(Value::as_object);
        let patterns: Vec<Regex> = parent
            .get("patternProperties")
            .and_then(Value::as_object)
            .map(|patterns| patterns.keys().filter_map(|p| Regex::new(p).ok()).collect())
            .unwrap_or_default();

        object
            .keys()
            .find(|key| {
                !declared.is_some_and(|props| props.contains_key(key.as_str()))
                    && !patterns.iter().any(|re| re.is_match(key))
            })
            .cloned()
    }
}
