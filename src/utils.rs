use crate::error::GitletError;
use chrono::{Local, TimeZone, Utc};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::fs;
use std::path::Path;

/// fingerprint raw bytes to 40 lowercase hex chars
pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// fingerprint file contents
pub fn fingerprint_file(path: &Path) -> Result<String, GitletError> {
    let bytes = fs::read(path).map_err(|e| GitletError::Io(format!("{:?}", e)))?;
    Ok(fingerprint_bytes(&bytes))
}

/// serialize a record to json and write it at path
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), GitletError> {
    let content =
        serde_json::to_string(value).map_err(|e| GitletError::Serde(format!("{:?}", e)))?;
    fs::write(path, content).map_err(|e| GitletError::Io(format!("{:?}", e)))
}

/// read a json record back from path
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, GitletError> {
    let content = fs::read_to_string(path).map_err(|e| GitletError::Io(format!("{:?}", e)))?;
    serde_json::from_str(&content).map_err(|e| GitletError::Serde(format!("{:?}", e)))
}

/// copy file to repo-internal location, e.g. working copy into staging
pub fn copy_to(path: &Path, dist: &Path) -> Result<(), GitletError> {
    if path.exists() && path.is_file() {
        info!("copy {} to {}", path.display(), dist.display());
        fs::copy(path, dist).map_err(|e| GitletError::Io(format!("{:?}", e)))?;
        Ok(())
    } else {
        Err(GitletError::Io(format!(
            "copy source missing: {}",
            path.display()
        )))
    }
}

/// Names of the regular files at the top of a directory, sorted.
/// Subdirectories (the repository dir included) are not tracked.
pub fn list_files(dir: &Path) -> Result<Vec<String>, GitletError> {
    let mut names = Vec::new();
    if dir.exists() && dir.is_dir() {
        for entry in fs::read_dir(dir).map_err(|e| GitletError::Io(format!("{:?}", e)))? {
            let entry = entry.map_err(|e| GitletError::Io(format!("{:?}", e)))?;
            let path = entry.path();
            if path.is_file() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
    }
    names.sort();
    Ok(names)
}

/// "EEE MMM dd HH:mm:ss yyyy Z" rendering of a millisecond timestamp,
/// in the local zone
pub fn display_time(ts_millis: i64) -> String {
    match Utc.timestamp_millis_opt(ts_millis).single() {
        Some(dt) => dt
            .with_timezone(&Local)
            .format("%a %b %d %H:%M:%S %Y %z")
            .to_string(),
        None => String::new(),
    }
}
