//! Line locator.
//!
//! Maps an instance path to a line of the pretty-printed document by replaying
//! the printer's layout instead of tracking source positions:
//!
//! ```text
//! {                    0   object open
//!   "title": "x",      1   scalar
//!   "items": [         2   array open
//!     1,               3
//!     2                4
//!   ],                 5   array close
//!   "meta": {}         6   empty container, one line
//! }                    7   object close
//! ```
//!
//! Lines are 0-based. The replay only matches files written by the canonical
//! formatter (`utils::fs::to_pretty_json`); hand-formatted files get an
//! approximate line.

use super::schema::PathSegment;
use serde_json::Value;
use std::fmt::Write;

/// 0-based line of `path` inside `document`, or `None` when the path does
/// not exist in the document.
pub fn json_path_to_line(document: &Value, path: &[PathSegment]) -> Option<usize> {
    let mut node = document;
    let mut line = 0;

    for segment in path {
        // skip the opening bracket
        line += 1;
        node = match (node, segment) {
            (Value::Object(map), PathSegment::Key(key)) => {
                let mut child = None;
                for (name, value) in map {
                    if name == key {
                        child = Some(value);
                        break;
                    }
                    line += line_count(value);
                }
                child?
            }
            (Value::Array(items), PathSegment::Index(index)) => {
                let child = items.get(*index)?;
                line += items[..*index].iter().map(line_count).sum::<usize>();
                child
            }
            _ => return None,
        };
    }
    Some(line)
}

/// Lines the pretty-printer spends on `value`.
fn line_count(value: &Value) -> usize {
    match value {
        Value::Object(map) if !map.is_empty() => 2 + map.values().map(line_count).sum::<usize>(),
        Value::Array(items) if !items.is_empty() => 2 + items.iter().map(line_count).sum::<usize>(),
        _ => 1,
    }
}

/// `radius` lines either side of `line` (0-based), numbered from 1, with the
/// target marked by `>`.
pub fn render_context(text: &str, line: usize, radius: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = line.saturating_sub(radius);
    let end = lines.len().min(line + radius + 1);

    let mut out = String::new();
    for (index, content) in lines.iter().enumerate().take(end).skip(start) {
        let marker = if index == line { '>' } else { ' ' };
        let _ = writeln!(out, "{marker} {:4} | {}", index + 1, content.trim_end());
    }
    out
}
