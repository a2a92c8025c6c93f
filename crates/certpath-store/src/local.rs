//! Local slot
//!
//! A single key-value slot on the user's machine. Reads and writes are
//! synchronous and the last write wins.

use crate::error::StoreError;
use crate::naming::LOCAL_SLOT;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Synchronous single-slot storage
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait LocalStore: Send + Sync {
    /// Read the slot, `None` when it was never written
    ///
    /// # Errors
    /// Returns `StoreError` if the slot exists but cannot be read.
    fn get(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the slot contents
    ///
    /// # Errors
    /// Returns `StoreError` if the slot cannot be written.
    fn set(&self, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Slot backed by a file under the data directory
#[derive(Debug, Clone)]
pub struct FileLocalStore {
    path: PathBuf,
}

impl FileLocalStore {
    /// Slot file inside `data_dir`
    #[must_use]
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{LOCAL_SLOT}.json")),
        }
    }

    /// Slot file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalStore for FileLocalStore {
    fn get(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io_error(&self.path, e)),
        }
    }

    fn set(&self, bytes: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io_error(parent, e))?;
        }
        // Write beside the slot then rename so a crash never leaves half a document
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes).map_err(|e| StoreError::io_error(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::io_error(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "local slot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocalStore::in_dir(dir.path());
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocalStore::in_dir(dir.path().join("nested"));
        store.set(b"first").unwrap();
        store.set(b"second").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some(&b"second"[..]));
        assert!(store.path().ends_with("agentic_roadmap_data.json"));
    }
}
