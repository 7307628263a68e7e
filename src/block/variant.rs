//! Variant data and its inline block references.

use super::is_block_name;
use crate::error::{BlockError, Result};
use crate::utils::fs::read_text;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Reserved variant field listing nested blocks.
pub const INLINE_BLOCK: &str = "inline_block";

/// One entry of a variant's `inline_block` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRef {
    pub block_name: String,
    /// Overrides the parent's realization when present.
    pub realization_name: Option<String>,
}

impl InlineRef {
    /// Effective realization: the explicit one, else the parent's.
    pub fn realization_or<'a>(&'a self, parent: &'a str) -> &'a str {
        self.realization_name.as_deref().unwrap_or(parent)
    }
}

/// A parsed variant file. The root is always a JSON object.
#[derive(Debug, Clone)]
pub struct VariantData {
    path: PathBuf,
    data: Map<String, Value>,
}

impl VariantData {
    /// Read and parse a variant file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        let value: Value = serde_json::from_str(&text).map_err(|err| BlockError::json(path, err))?;
        Self::from_value(path, value)
    }

    pub fn from_value(path: &Path, value: Value) -> Result<Self> {
        match value {
            Value::Object(data) => Ok(Self {
                path: path.to_path_buf(),
                data,
            }),
            other => Err(BlockError::InvalidVariant {
                path: path.to_path_buf(),
                reason: format!("JSON root must be an object, found {}", type_name(&other)),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.data)
    }

    /// Nested block references, in array order.
    pub fn inline_refs(&self) -> Result<Vec<InlineRef>> {
        let Some(field) = self.data.get(INLINE_BLOCK) else {
            return Ok(Vec::new());
        };
        let Value::Array(entries) = field else {
            return Err(BlockError::InvalidVariant {
                path: self.path.clone(),
                reason: format!("`{INLINE_BLOCK}` must be an array"),
            });
        };

        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| self.inline_ref(index, entry))
            .collect()
    }

    fn inline_ref(&self, index: usize, entry: &Value) -> Result<InlineRef> {
        let malformed = |reason: &str| BlockError::MalformedInlineRef {
            path: self.path.clone(),
            index,
            reason: reason.to_owned(),
        };

        let Value::Object(entry) = entry else {
            return Err(malformed("must be an object"));
        };
        let block_name = match entry.get("block_name") {
            Some(Value::String(name)) if is_block_name(name) => name.clone(),
            Some(Value::String(name)) => {
                return Err(malformed(&format!(
                    "has block_name `{name}` that is not a single directory name"
                )));
            }
            Some(_) => return Err(malformed("has a block_name that is not a string")),
            None => return Err(malformed("must contain block_name")),
        };
        let realization_name = match entry.get("realization_name") {
            Some(Value::String(name)) => Some(name.clone()),
            Some(_) => return Err(malformed("has a realization_name that is not a string")),
            None => None,
        };

        Ok(InlineRef {
            block_name,
            realization_name,
        })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn variant(value: Value) -> Result<VariantData> {
        VariantData::from_value(Path::new("hero/consular_ua.json"), value)
    }

    #[test]
    fn test_root_must_be_object() {
        let err = variant(json!([1, 2])).unwrap_err();
        assert!(matches!(err, BlockError::InvalidVariant { .. }));
        assert!(format!("{err}").contains("found array"));
    }

    #[test]
    fn test_no_inline_block() {
        let data = variant(json!({"title": "x"})).unwrap();
        assert!(data.inline_refs().unwrap().is_empty());
    }

    #[test]
    fn test_inline_refs_in_order() {
        let data = variant(json!({
            "inline_block": [
                {"block_name": "footer"},
                {"block_name": "contacts_block", "realization_name": "consular_en"}
            ]
        }))
        .unwrap();

        let refs = data.inline_refs().unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].block_name, "footer");
        assert_eq!(refs[0].realization_or("consular_ua"), "consular_ua");
        assert_eq!(refs[1].realization_or("consular_ua"), "consular_en");
    }

    #[test]
    fn test_inline_block_not_array() {
        let data = variant(json!({"inline_block": {"block_name": "footer"}})).unwrap();
        assert!(matches!(
            data.inline_refs(),
            Err(BlockError::InvalidVariant { .. })
        ));
    }

    #[test]
    fn test_inline_entry_not_object() {
        let data = variant(json!({"inline_block": ["footer"]})).unwrap();
        let err = data.inline_refs().unwrap_err();
        assert!(matches!(err, BlockError::MalformedInlineRef { index: 0, .. }));
    }

    #[test]
    fn test_inline_entry_missing_block_name() {
        let data = variant(json!({
            "inline_block": [{"block_name": "footer"}, {"realization_name": "consular_ua"}]
        }))
        .unwrap();
        let err = data.inline_refs().unwrap_err();
        assert!(matches!(err, BlockError::MalformedInlineRef { index: 1, .. }));
        assert!(format!("{err}").contains("must contain block_name"));
    }

    #[test]
    fn test_inline_block_name_must_be_plain_dir() {
        for name in ["", "..", "../x", "a/b", "/etc", "./footer"] {
            let data = variant(json!({"inline_block": [{"block_name": name}]})).unwrap();
            let err = data.inline_refs().unwrap_err();
            assert!(
                matches!(err, BlockError::MalformedInlineRef { index: 0, .. }),
                "accepted `{name}`"
            );
        }
    }

    #[test]
    fn test_inline_entry_bad_realization_type() {
        let data = variant(json!({
            "inline_block": [{"block_name": "footer", "realization_name": 3}]
        }))
        .unwrap();
        assert!(data.inline_refs().is_err());
    }
}
