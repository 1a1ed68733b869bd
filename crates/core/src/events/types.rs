use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{ContentType, Stage};

/// Events emitted after lifecycle operations, consumed by the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentEvent {
    Saved(PostEvent),
    Published(PostEvent),
    Unpublished(PostEvent),
    Deleted(PostEvent),
    ImagesRemoved(ImagesRemovedEvent),
    CorruptDocument(CorruptDocumentEvent),
    CleanupExecuted(CleanupEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEvent {
    pub content_type: ContentType,
    pub id: String,
    pub timestamp: DateTime<Utc>,
}

impl PostEvent {
    pub fn now(content_type: ContentType, id: impl Into<String>) -> Self {
        Self {
            content_type,
            id: id.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagesRemovedEvent {
    pub content_type: ContentType,
    pub post_id: String,
    pub filenames: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorruptDocumentEvent {
    pub content_type: ContentType,
    pub stage: Stage,
    pub path: String,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupEvent {
    pub deleted_count: usize,
    pub freed_space: u64,
    pub timestamp: DateTime<Utc>,
}
