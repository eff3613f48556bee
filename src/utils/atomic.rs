//! Atomic file operations
//!
//! Writes never replace the data file in place.
//!
//! # Pattern
//!
//! 1. Write to a temporary file (.tmp) next to the target
//! 2. Call sync_all() to flush to disk
//! 3. Rename temp file to final path (atomic on most filesystems)
//!
//! This ensures that the final file is either:
//! - The old version (if the write failed or crashed before rename)
//! - The new version (if rename completed)
//! - Never a partial/corrupted state

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Path of the temp file used while replacing `path`
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Atomically replace `path` with `content`
///
/// On error the temp file is removed and the previous content of `path`
/// is left untouched.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    let result = write_and_rename(&temp_path, path, content);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_rename(temp_path: &Path, path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(temp_path)?;
    file.write_all(content)?;

    // Sync to disk (ensure data is durable)
    file.sync_all()?;
    drop(file);

    fs::rename(temp_path, path)
}

/// Move `from` aside to `backup`, replacing any previous backup
///
/// # Returns
///
/// * `Ok(true)` - File was moved
/// * `Ok(false)` - Source file doesn't exist
pub fn move_aside<P1, P2>(from: P1, backup: P2) -> io::Result<bool>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let from = from.as_ref();
    let backup = backup.as_ref();

    if !from.exists() {
        return Ok(false);
    }
    if backup.exists() {
        fs::remove_file(backup)?;
    }
    fs::rename(from, backup)?;

    Ok(true)
}

/// Remove the temp file a crashed `atomic_write` may have left for `path`
///
/// Only the temp sibling of `path` is touched. Returns whether one existed.
pub fn remove_stale_temp<P: AsRef<Path>>(path: P) -> io::Result<bool> {
    let temp_path = temp_path_for(path.as_ref());

    match fs::remove_file(&temp_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
