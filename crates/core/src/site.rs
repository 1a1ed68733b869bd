use std::path::PathBuf;
use std::sync::Arc;

use crate::chat::ChatLog;
use crate::error::StorageError;
use crate::events::EventBus;
use crate::images::{CleanupScanner, ImageStore};
use crate::lifecycle::{ContentLocks, ContentService};
use crate::store::{ContentStore, DataLayout, RecoveryPolicy};

/// Everything backed by one data directory, wired to share locks and events.
#[derive(Debug, Clone)]
pub struct Site {
    pub layout: DataLayout,
    pub content: ContentService,
    pub cleanup: CleanupScanner,
    pub chat: Arc<ChatLog>,
    pub events: EventBus,
}

impl Site {
    /// Create missing directories and documents under `root`, then build the services.
    pub async fn open(
        root: impl Into<PathBuf>,
        policy: RecoveryPolicy,
        events: EventBus,
    ) -> Result<Self, StorageError> {
        let layout = DataLayout::new(root);
        layout.bootstrap().await?;

        let store = ContentStore::new(layout.clone(), policy, events.clone());
        let images = ImageStore::new(layout.images_dir());
        let locks = Arc::new(ContentLocks::new());

        Ok(Self {
            content: ContentService::new(
                store.clone(),
                images.clone(),
                locks.clone(),
                events.clone(),
            ),
            cleanup: CleanupScanner::new(store, images, locks, events.clone()),
            chat: Arc::new(ChatLog::new(layout.chat_path())),
            layout,
            events,
        })
    }
}
