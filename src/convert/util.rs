use crate::error::ConvertError;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

pub fn read_input(path: &Path) -> Result<Vec<u8>, ConvertError> {
    fs::read(path).map_err(|e| ConvertError::io(path, e))
}

/// Write `bytes` to `dest` through a temp file in the same directory, so a
/// failed run never leaves a partial file at `dest`.
pub fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ConvertError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| ConvertError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| ConvertError::io(tmp.path(), e))?;
    tmp.persist(dest).map_err(|e| ConvertError::io(dest, e.error))?;
    Ok(())
}
