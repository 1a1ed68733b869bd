use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::error::StorageError;
use crate::events::types::{CleanupEvent, ContentEvent};
use crate::events::EventBus;
use crate::lifecycle::ContentLocks;
use crate::store::ContentStore;

use super::files::{ImageFile, ImageStore};
use super::tracker::referenced_images_everywhere;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrphanImage {
    pub filename: String,
    pub size: u64,
    pub size_mb: f64,
}

/// Result of a read-only scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub total_images: usize,
    pub referenced_images: usize,
    pub unreferenced_count: usize,
    pub unreferenced_details: Vec<OrphanImage>,
    pub total_size: u64,
    pub total_size_mb: f64,
}

/// Result of deleting orphans.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupReport {
    pub deleted_count: usize,
    pub freed_space: u64,
    pub freed_space_mb: f64,
}

/// Reconciles the images directory against what posts reference.
#[derive(Debug, Clone)]
pub struct CleanupScanner {
    store: ContentStore,
    images: ImageStore,
    locks: Arc<ContentLocks>,
    events: EventBus,
}

impl CleanupScanner {
    pub fn new(
        store: ContentStore,
        images: ImageStore,
        locks: Arc<ContentLocks>,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            images,
            locks,
            events,
        }
    }

    /// Report orphaned images without touching the filesystem.
    pub async fn scan(&self) -> Result<ScanReport, StorageError> {
        let (all, referenced) = self.inventory().await?;
        let orphans = orphans(&all, &referenced);
        let total_size = orphans.iter().map(|f| f.size).sum();

        Ok(ScanReport {
            total_images: all.len(),
            referenced_images: referenced.len(),
            unreferenced_count: orphans.len(),
            unreferenced_details: orphans
                .into_iter()
                .map(|f| OrphanImage {
                    size_mb: to_mb(f.size),
                    filename: f.filename,
                    size: f.size,
                })
                .collect(),
            total_size,
            total_size_mb: to_mb(total_size),
        })
    }

    /// Delete every orphaned image. Holds all content sections so no post can
    /// start referencing a file between the scan and its deletion.
    pub async fn execute(&self) -> Result<CleanupReport, StorageError> {
        let _guards = self.locks.lock_all().await;
        let (all, referenced) = self.inventory().await?;

        let mut deleted_count = 0;
        let mut freed_space = 0;
        for orphan in orphans(&all, &referenced) {
            // Files that vanished since listing are simply skipped.
            if let Some(size) = self.images.remove(&orphan.filename).await {
                deleted_count += 1;
                freed_space += size;
            }
        }

        tracing::info!(deleted_count, freed_space, "orphaned images cleaned up");
        let _ = self.events.publish(ContentEvent::CleanupExecuted(CleanupEvent {
            deleted_count,
            freed_space,
            timestamp: Utc::now(),
        }));

        Ok(CleanupReport {
            deleted_count,
            freed_space,
            freed_space_mb: to_mb(freed_space),
        })
    }

    async fn inventory(&self) -> Result<(Vec<ImageFile>, BTreeSet<String>), StorageError> {
        let all = self.images.list().await?;
        let referenced = referenced_images_everywhere(&self.store).await?;
        Ok((all, referenced))
    }
}

fn orphans(all: &[ImageFile], referenced: &BTreeSet<String>) -> Vec<ImageFile> {
    all.iter()
        .filter(|f| !referenced.contains(&f.filename))
        .cloned()
        .collect()
}

/// Megabytes rounded to two decimals.
fn to_mb(bytes: u64) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}
