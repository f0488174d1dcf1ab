//! File-backed key-value store used by the local cache.
//!
//! One file per key, with hex-encoded key names so opaque hashes can never
//! escape the store directory. Writes go through a temp file and an atomic
//! rename. Capacity is not enforced here; that is the cache's policy layer.

use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A string-keyed get/set/delete store over a single directory.
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hex::encode(key)))
    }

    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry exists but cannot be read.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// The value is staged in a temp file and moved into place, so a
    /// failed write never leaves a truncated entry behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(value.as_bytes())?;
        staged
            .persist(&path)
            .map_err(|e| Error::Storage(format!("failed to persist {}: {e}", path.display())))?;
        Ok(())
    }

    /// Delete the entry under `key`. Deleting a missing key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing entry cannot be removed.
    pub fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}
