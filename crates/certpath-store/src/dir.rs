//! Directory-backed remote store
//!
//! Each artifact is a file in one directory, the handle is its file name.
//! Suitable for a synced folder shared between machines.

use crate::error::StoreError;
use crate::remote::{RemoteHandle, RemoteStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Remote store over a local directory
#[derive(Debug, Clone)]
pub struct DirRemoteStore {
    root: PathBuf,
}

impl DirRemoteStore {
    /// Store rooted at `root`, created on first write
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\', '\0']);
        if valid {
            Ok(self.root.join(name))
        } else {
            Err(StoreError::InvalidName(name.to_string()))
        }
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::io_error(&self.root, e))?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StoreError::io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| StoreError::io_error(path, e))
    }
}

#[async_trait::async_trait]
impl RemoteStore for DirRemoteStore {
    async fn find(&self, name: &str) -> Result<Option<RemoteHandle>, StoreError> {
        let path = self.path_for(name)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(RemoteHandle(name.to_string()))),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io_error(path, e)),
        }
    }

    async fn create(&self, name: &str, bytes: &[u8]) -> Result<RemoteHandle, StoreError> {
        let path = self.path_for(name)?;
        if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::io_error(&path, e))?
        {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        self.write(&path, bytes).await?;
        tracing::debug!(artifact = name, "remote artifact created");
        Ok(RemoteHandle(name.to_string()))
    }

    async fn update(&self, handle: &RemoteHandle, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(handle.as_str())?;
        if !tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::io_error(&path, e))?
        {
            return Err(StoreError::NotFound(handle.as_str().to_string()));
        }
        self.write(&path, bytes).await?;
        tracing::debug!(artifact = handle.as_str(), "remote artifact updated");
        Ok(())
    }

    async fn read(&self, handle: &RemoteHandle) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(handle.as_str())?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(handle.as_str().to_string()))
            }
            Err(e) => Err(StoreError::io_error(path, e)),
        }
    }
}
