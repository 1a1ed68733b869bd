//! Whole-document JSON persistence.
//!
//! Writes never touch the target file directly: the serialized document is
//! staged in a hidden sibling, flushed, then renamed over the target. A
//! reader therefore sees either the old or the new document, never a torn
//! one. Staging and committing are separate steps so a caller can stage
//! several documents before committing any of them.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::StorageError;

/// Read and parse a document. `Ok(None)` means the file does not exist.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path, e)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

/// Stage and immediately commit a document.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    stage_json(path, value).await?.commit().await
}

/// Serialize `value` into a temporary file next to `path`.
pub async fn stage_json<T: Serialize>(path: &Path, value: &T) -> Result<StagedWrite, StorageError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StorageError::io(parent, e))?;
    }

    let tmp = temp_path_for(path);
    let staged = StagedWrite {
        tmp: Some(tmp.clone()),
        target: path.to_path_buf(),
    };

    let mut file = tokio::fs::File::create(&tmp)
        .await
        .map_err(|e| StorageError::io(&tmp, e))?;
    file.write_all(&bytes)
        .await
        .map_err(|e| StorageError::io(&tmp, e))?;
    file.sync_all()
        .await
        .map_err(|e| StorageError::io(&tmp, e))?;

    Ok(staged)
}

/// A fully written temporary file waiting to replace its target.
/// Dropping it without committing removes the temporary file.
#[derive(Debug)]
pub struct StagedWrite {
    tmp: Option<PathBuf>,
    target: PathBuf,
}

impl StagedWrite {
    /// Atomically replace the target with the staged content.
    pub async fn commit(mut self) -> Result<(), StorageError> {
        let Some(tmp) = self.tmp.take() else {
            return Ok(());
        };
        if let Err(e) = tokio::fs::rename(&tmp, &self.target).await {
            let _ = std::fs::remove_file(&tmp);
            return Err(StorageError::io(&self.target, e));
        }
        Ok(())
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        if let Some(tmp) = self.tmp.take() {
            let _ = std::fs::remove_file(tmp);
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
}
