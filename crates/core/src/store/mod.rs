pub mod document;
pub mod layout;

use std::path::Path;
use std::str::FromStr;

use chrono::Utc;

use crate::content::{ContentCollection, ContentType, Stage};
use crate::error::StorageError;
use crate::events::bus::EventBus;
use crate::events::types::{ContentEvent, CorruptDocumentEvent};

pub use document::StagedWrite;
pub use layout::DataLayout;

/// What to do when a backing document fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// Keep a `.corrupt` copy, report it, and carry on with an empty collection.
    #[default]
    Empty,
    /// Fail the operation with [`StorageError::Corrupt`].
    Propagate,
}

impl FromStr for RecoveryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "empty" => Ok(RecoveryPolicy::Empty),
            "propagate" => Ok(RecoveryPolicy::Propagate),
            other => Err(format!("unknown recovery policy: {other}")),
        }
    }
}

/// Per-content-type draft and published documents.
#[derive(Debug, Clone)]
pub struct ContentStore {
    layout: DataLayout,
    policy: RecoveryPolicy,
    events: EventBus,
}

impl ContentStore {
    pub fn new(layout: DataLayout, policy: RecoveryPolicy, events: EventBus) -> Self {
        Self {
            layout,
            policy,
            events,
        }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Read a collection, failing on corruption regardless of policy.
    /// A missing document is an empty collection.
    pub async fn load(
        &self,
        content_type: ContentType,
        stage: Stage,
    ) -> Result<ContentCollection, StorageError> {
        let path = self.layout.document_path(content_type, stage);
        Ok(document::read_json(&path).await?.unwrap_or_default())
    }

    /// Read a collection, applying the configured [`RecoveryPolicy`].
    pub async fn read(
        &self,
        content_type: ContentType,
        stage: Stage,
    ) -> Result<ContentCollection, StorageError> {
        match self.load(content_type, stage).await {
            Err(StorageError::Corrupt { path, source }) if self.policy == RecoveryPolicy::Empty => {
                self.report_corrupt(content_type, stage, &path, &source).await;
                tracing::warn!(
                    %content_type,
                    %stage,
                    path = %path.display(),
                    "corrupt document replaced by empty collection: {source}"
                );
                Ok(ContentCollection::default())
            }
            other => other,
        }
    }

    /// Keep a `.corrupt` copy of an unparseable document and announce it on the bus.
    pub(crate) async fn report_corrupt(
        &self,
        content_type: ContentType,
        stage: Stage,
        path: &Path,
        source: &serde_json::Error,
    ) {
        let backup = path.with_extension("json.corrupt");
        match tokio::fs::copy(path, &backup).await {
            Ok(_) => tracing::info!(backup = %backup.display(), "corrupt document backed up"),
            Err(e) => {
                tracing::error!(path = %path.display(), "failed to back up corrupt document: {e}")
            }
        }
        let _ = self
            .events
            .publish(ContentEvent::CorruptDocument(CorruptDocumentEvent {
                content_type,
                stage,
                path: path.display().to_string(),
                error: source.to_string(),
                timestamp: Utc::now(),
            }));
    }

    /// Replace the whole document.
    pub async fn write(
        &self,
        content_type: ContentType,
        stage: Stage,
        collection: &ContentCollection,
    ) -> Result<(), StorageError> {
        self.stage(content_type, stage, collection).await?.commit().await
    }

    /// Stage a replacement without committing it.
    pub async fn stage(
        &self,
        content_type: ContentType,
        stage: Stage,
        collection: &ContentCollection,
    ) -> Result<StagedWrite, StorageError> {
        let path = self.layout.document_path(content_type, stage);
        document::stage_json(&path, collection).await
    }
}
