//! JSON document IO shared by every registry.
//!
//! A missing file is not an error: readers get `Ok(None)` and fall back to
//! defaults. Writers go through a temporary file and an atomic rename so a
//! crash mid-write never leaves a truncated document behind.

use error::ProgressionError;
use serde::{Serialize, de::DeserializeOwned};
use std::{fs, io::Write, path::Path};

/// Result of a tolerant load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The document existed and was applied
    Loaded,
    /// No document at the path; live state keeps its defaults
    Missing,
}

/// Serialize `value` as pretty JSON and atomically replace `path`
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ProgressionError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    serde_json::to_writer_pretty(&mut file, value)
        .map_err(|e| ProgressionError::Serialization(e.to_string()))?;
    file.flush()?;

    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Read a JSON document, returning `Ok(None)` when the file does not exist
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ProgressionError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| ProgressionError::malformed(path, e))
}

/// Reject documents written by a newer format
pub fn check_version(found: u32, supported: u32) -> Result<(), ProgressionError> {
    if found > supported {
        return Err(ProgressionError::UnsupportedVersion { found, supported });
    }
    Ok(())
}
