//! Artifact output writers.
//!
//! Snapshots are pretty-printed (two-space indent) ASCII-escaped JSON so
//! artifacts diff cleanly and survive tooling that mangles non-ASCII text.

use serde::Serialize;
use std::path::Path;

pub mod path;

pub use path::{slugify, ArtifactPaths};

/// Output errors.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Filesystem failure while creating directories or writing a file
    #[error("io error: {0}")]
    Io(String),

    /// Serialization failure
    #[error("serialize error: {0}")]
    Serialize(String),
}

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Write a value as pretty-printed, ASCII-escaped JSON, creating parent
/// directories as needed. An existing file is overwritten - artifacts have
/// replace semantics, never append.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> OutputResult<()> {
    let rendered = to_ascii_json(value)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| OutputError::Io(format!("creating {}: {e}", parent.display())))?;
    }
    std::fs::write(path, rendered)
        .map_err(|e| OutputError::Io(format!("writing {}: {e}", path.display())))
}

/// Render pretty JSON with every non-ASCII character escaped as \uXXXX.
pub fn to_ascii_json<T: Serialize>(value: &T) -> OutputResult<String> {
    let pretty =
        serde_json::to_string_pretty(value).map_err(|e| OutputError::Serialize(e.to_string()))?;
    Ok(escape_non_ascii(&pretty))
}

/// Escape non-ASCII characters in rendered JSON.
///
/// Safe to apply to the whole document: in valid JSON, non-ASCII characters
/// only ever appear inside string literals. Characters beyond the basic
/// multilingual plane become surrogate pairs, matching the \uXXXX form.
fn escape_non_ascii(rendered: &str) -> String {
    if rendered.is_ascii() {
        return rendered.to_string();
    }

    let mut out = String::with_capacity(rendered.len());
    for ch in rendered.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ascii_json_is_pretty_printed() {
        let value = json!({"a": 1, "b": [true]});
        let rendered = to_ascii_json(&value).unwrap();
        assert_eq!(rendered, "{\n  \"a\": 1,\n  \"b\": [\n    true\n  ]\n}");
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        let value = json!({"country": "Türkiye"});
        let rendered = to_ascii_json(&value).unwrap();
        assert!(rendered.contains("T\\u00fcrkiye"));
        assert!(rendered.is_ascii());
    }

    #[test]
    fn test_astral_characters_become_surrogate_pairs() {
        let value = json!({"note": "📈"});
        let rendered = to_ascii_json(&value).unwrap();
        assert!(rendered.contains("\\ud83d\\udcc8"));
    }

    #[test]
    fn test_write_json_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");

        write_json(&path, &json!({"v": 1})).unwrap();
        write_json(&path, &json!({"v": 2})).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "{\n  \"v\": 2\n}");
    }
}
