//! JSON document I/O for the tool family.
//!
//! Loading from stdin or a named file, non-recursive `*.json` discovery
//! for directory mode, and pretty-printed output for the file-writing
//! tools.

use std::io::Read;
use std::path::{Path, PathBuf};

use aw_core::error::{AwError, Result};
use serde_json::Value;

/// Read one JSON document from `path`, or from stdin when `path` is `None`.
pub fn read_document(path: Option<&Path>) -> Result<Value> {
    let text = match path {
        Some(p) => std::fs::read_to_string(p).map_err(|source| AwError::FileRead {
            path: p.to_path_buf(),
            source,
        })?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(serde_json::from_str(&text)?)
}

/// All `*.json` files directly inside `dir`, sorted by path.
///
/// Errors when `dir` is not a directory or contains no JSON files.
pub fn find_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AwError::NotADirectory(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    if files.is_empty() {
        return Err(AwError::NoJsonFiles(dir.to_path_buf()));
    }

    files.sort();
    Ok(files)
}

/// Write `value` as 2-space-indented JSON to `path`, creating parent
/// directories as needed.
pub fn write_pretty_json(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    std::fs::write(path, text)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
