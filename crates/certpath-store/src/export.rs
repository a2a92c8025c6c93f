//! Backup export to a user-chosen directory

use crate::error::StoreError;
use crate::naming;
use certpath_model::{codec, RoadmapDocument};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Write `doc` as `agentic_roadmap_backup_<date>.json` inside `dir`
///
/// Returns the written path. An existing backup for the same day is replaced.
///
/// # Errors
/// Returns `StoreError` if encoding or the write fails.
pub async fn write_backup(
    dir: impl AsRef<Path>,
    doc: &RoadmapDocument,
    date: NaiveDate,
) -> Result<PathBuf, StoreError> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| StoreError::io_error(dir, e))?;
    let path = dir.join(naming::export_file(date));
    let bytes = codec::encode(doc)?;
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| StoreError::io_error(&path, e))?;
    tracing::info!(path = %path.display(), "backup exported");
    Ok(path)
}
