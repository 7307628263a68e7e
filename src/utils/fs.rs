//! Text file helpers that attach the offending path to I/O errors.

use crate::error::{BlockError, Result};
use std::fs;
use std::path::Path;

/// Read a UTF-8 text file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| BlockError::io(path, err))
}

/// Write a text file, creating missing parent directories.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| BlockError::io(parent, err))?;
    }
    fs::write(path, content).map_err(|err| BlockError::io(path, err))
}

/// Serialize JSON the way variant files are authored: two-space indent,
/// non-ASCII kept verbatim, trailing newline.
pub fn to_pretty_json(value: &serde_json::Value) -> String {
    // Serializing a `Value` into a `String` cannot fail.
    let mut text = serde_json::to_string_pretty(value).unwrap_or_default();
    text.push('\n');
    text
}
