use std::path::PathBuf;

use thiserror::Error;

use crate::content::validate::ValidationError;
use crate::content::ContentType;

/// Failures reading or writing a backing JSON document.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt document {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize document for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors surfaced by the draft/publish lifecycle.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid content type: {0}")]
    InvalidContentType(String),

    #[error("post {id} not found in {content_type}")]
    NotFound { content_type: ContentType, id: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type ContentResult<T> = Result<T, ContentError>;
