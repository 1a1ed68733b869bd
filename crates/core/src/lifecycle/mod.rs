//! Draft/publish lifecycle.
//!
//! The draft collection is the source of truth for every post of a content
//! type; the published collection is the public projection of the posts whose
//! status is `published`, newest first. Each operation below runs inside the
//! content type's exclusive section and rewrites one or both documents.
//!
//! When both documents change, both are staged before either is committed.
//! A crash between the two renames can still leave the pair disagreeing about
//! a post; [`ContentService::reconcile`] repairs that and runs at startup.

pub mod locks;

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::content::id::generate_id;
use crate::content::validate::validate_post;
use crate::content::{ContentCollection, ContentType, Post, PostStatus, Stage};
use crate::error::{ContentError, ContentResult, StorageError};
use crate::events::types::{ContentEvent, ImagesRemovedEvent, PostEvent};
use crate::events::EventBus;
use crate::images::files::ImageStore;
use crate::images::tracker::{diff, image_filenames, referenced_in};
use crate::store::ContentStore;

pub use locks::ContentLocks;

/// What [`ContentService::reconcile`] changed in the published collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Published entries with no published draft behind them.
    pub dropped: Vec<String>,
    /// Published drafts that were missing or stale in the published collection.
    pub restored: Vec<String>,
    /// Set when a document of the pair failed to parse; nothing was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<Stage>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.restored.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ContentService {
    store: ContentStore,
    images: ImageStore,
    locks: Arc<ContentLocks>,
    events: EventBus,
}

impl ContentService {
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

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Every post of a type regardless of status (admin view).
    pub async fn list_drafts(&self, content_type: ContentType) -> ContentResult<Vec<Post>> {
        Ok(self.store.read(content_type, Stage::Draft).await?.posts)
    }

    /// Currently public posts of a type, newest first.
    pub async fn list_published(&self, content_type: ContentType) -> ContentResult<Vec<Post>> {
        Ok(self.store.read(content_type, Stage::Published).await?.posts)
    }

    pub async fn get_published(&self, content_type: ContentType, id: &str) -> ContentResult<Post> {
        self.store
            .read(content_type, Stage::Published)
            .await?
            .find(id)
            .cloned()
            .ok_or_else(|| not_found(content_type, id))
    }

    /// Insert or update a post in the draft collection.
    ///
    /// Timestamps are maintained here, not by the caller. Image files dropped
    /// from the post's `images` are deleted unless another post of the same
    /// type still refers to them. Saving with status `draft` takes the post
    /// off the published collection, even if only metadata changed; saving
    /// with status `published` refreshes its published copy.
    pub async fn save(&self, content_type: ContentType, mut post: Post) -> ContentResult<Post> {
        validate_post(&post)?;
        let _guard = self.locks.lock(content_type).await;
        let now = Utc::now();

        let mut drafts = self.store.read(content_type, Stage::Draft).await?;
        let id = match post.id.take() {
            Some(id) => id,
            None => generate_id(now, &drafts),
        };
        let existing = drafts.find(&id).cloned();

        let status = post
            .status
            .or_else(|| existing.as_ref().and_then(|p| p.status))
            .unwrap_or(PostStatus::Draft);
        post.id = Some(id.clone());
        post.status = Some(status);
        post.created_at = Some(existing.as_ref().and_then(|p| p.created_at).unwrap_or(now));
        post.updated_at = Some(now);
        post.published_at = existing.as_ref().and_then(|p| p.published_at);
        if status == PostStatus::Published && post.published_at.is_none() {
            post.published_at = Some(now);
        }

        let dropped_images = existing
            .as_ref()
            .map(|old| diff(&old.images, &post.images))
            .unwrap_or_default();

        drafts.upsert(post.clone());
        let mut published = self.store.read(content_type, Stage::Published).await?;
        let unpublished = match status {
            PostStatus::Draft => published.remove(&id).is_some(),
            PostStatus::Published => {
                published.upsert(post.clone());
                false
            }
        };
        let published_changed = unpublished || status == PostStatus::Published;

        let staged_drafts = self.store.stage(content_type, Stage::Draft, &drafts).await?;
        if published_changed {
            let staged_published = self
                .store
                .stage(content_type, Stage::Published, &published)
                .await?;
            staged_drafts.commit().await?;
            staged_published.commit().await?;
        } else {
            staged_drafts.commit().await?;
        }

        tracing::info!(%content_type, id = %id, ?status, "post saved");
        self.emit(ContentEvent::Saved(PostEvent::now(content_type, &id)));
        if unpublished {
            tracing::info!(%content_type, id = %id, "post retracted by draft save");
            self.emit(ContentEvent::Unpublished(PostEvent::now(content_type, &id)));
        }

        let still_referenced = referenced_in(&drafts, &published);
        self.remove_images(content_type, &id, &dropped_images, &still_referenced)
            .await;

        Ok(post)
    }

    /// Mark a draft as published and expose it in the published collection.
    pub async fn publish(&self, content_type: ContentType, id: &str) -> ContentResult<Post> {
        let _guard = self.locks.lock(content_type).await;
        let now = Utc::now();

        let mut drafts = self.store.read(content_type, Stage::Draft).await?;
        let post = drafts
            .find_mut(id)
            .ok_or_else(|| not_found(content_type, id))?;
        post.status = Some(PostStatus::Published);
        post.published_at = Some(now);
        let post = post.clone();

        let mut published = self.store.read(content_type, Stage::Published).await?;
        published.upsert(post.clone());

        self.commit_pair(content_type, (Stage::Draft, &drafts), (Stage::Published, &published))
            .await?;

        tracing::info!(%content_type, id, "post published");
        self.emit(ContentEvent::Published(PostEvent::now(content_type, id)));
        Ok(post)
    }

    /// Reopen a post for editing: it leaves the published collection at once
    /// and stays in the draft collection with status `draft`.
    pub async fn edit(&self, content_type: ContentType, id: &str) -> ContentResult<Post> {
        let _guard = self.locks.lock(content_type).await;

        let mut drafts = self.store.read(content_type, Stage::Draft).await?;
        let post = drafts
            .find_mut(id)
            .ok_or_else(|| not_found(content_type, id))?;
        post.status = Some(PostStatus::Draft);
        post.updated_at = Some(Utc::now());
        let post = post.clone();

        let mut published = self.store.read(content_type, Stage::Published).await?;
        let was_public = published.remove(id).is_some();

        self.commit_pair(content_type, (Stage::Published, &published), (Stage::Draft, &drafts))
            .await?;

        tracing::info!(%content_type, id, was_public, "post reopened for editing");
        if was_public {
            self.emit(ContentEvent::Unpublished(PostEvent::now(content_type, id)));
        }
        Ok(post)
    }

    /// Remove a post everywhere, along with its image files. Deleting an id
    /// that does not exist is a no-op, though any stray published entry with
    /// that id is still removed. Returns the deleted draft, if there was one.
    pub async fn delete(&self, content_type: ContentType, id: &str) -> ContentResult<Option<Post>> {
        let _guard = self.locks.lock(content_type).await;

        let mut drafts = self.store.read(content_type, Stage::Draft).await?;
        let removed = drafts.remove(id);
        let mut published = self.store.read(content_type, Stage::Published).await?;
        let removed_public = published.remove(id).is_some();

        self.commit_pair(content_type, (Stage::Draft, &drafts), (Stage::Published, &published))
            .await?;

        if removed.is_some() || removed_public {
            tracing::info!(%content_type, id, "post deleted");
            self.emit(ContentEvent::Deleted(PostEvent::now(content_type, id)));
        } else {
            tracing::debug!(%content_type, id, "delete of unknown post");
        }

        if let Some(post) = &removed {
            let owned = image_filenames([post]);
            let still_referenced = referenced_in(&drafts, &published);
            self.remove_images(content_type, id, &owned, &still_referenced)
                .await;
        }
        Ok(removed)
    }

    /// Bring the published collection back in line with the draft collection.
    pub async fn reconcile(&self, content_type: ContentType) -> ContentResult<ReconcileReport> {
        let _guard = self.locks.lock(content_type).await;

        // Strict reads: an empty stand-in for a corrupt document would make
        // every entry of the other one look stale.
        let drafts = match self.store.load(content_type, Stage::Draft).await {
            Ok(drafts) => drafts,
            Err(e) => return self.skip_reconcile(content_type, Stage::Draft, e).await,
        };
        let mut published = match self.store.load(content_type, Stage::Published).await {
            Ok(published) => published,
            Err(e) => return self.skip_reconcile(content_type, Stage::Published, e).await,
        };
        let mut report = ReconcileReport::default();

        published.posts.retain(|p| {
            let keep = p
                .id()
                .and_then(|id| drafts.find(id))
                .is_some_and(Post::is_published);
            if !keep {
                report.dropped.push(p.id().unwrap_or_default().to_string());
            }
            keep
        });

        for draft in drafts.posts.iter().rev().filter(|p| p.is_published()) {
            let Some(id) = draft.id() else { continue };
            if published.find(id) != Some(draft) {
                published.upsert(draft.clone());
                report.restored.push(id.to_string());
            }
        }

        if !report.is_clean() {
            self.store
                .write(content_type, Stage::Published, &published)
                .await?;
            tracing::warn!(
                %content_type,
                dropped = ?report.dropped,
                restored = ?report.restored,
                "published collection reconciled"
            );
        }
        Ok(report)
    }

    async fn skip_reconcile(
        &self,
        content_type: ContentType,
        stage: Stage,
        err: StorageError,
    ) -> ContentResult<ReconcileReport> {
        let (path, source) = match err {
            StorageError::Corrupt { path, source } => (path, source),
            other => return Err(other.into()),
        };
        self.store
            .report_corrupt(content_type, stage, &path, &source)
            .await;
        tracing::warn!(
            %content_type,
            %stage,
            path = %path.display(),
            "reconcile skipped, document does not parse: {source}"
        );
        Ok(ReconcileReport {
            skipped: Some(stage),
            ..ReconcileReport::default()
        })
    }

    /// Reconcile every content type.
    pub async fn reconcile_all(&self) -> ContentResult<Vec<(ContentType, ReconcileReport)>> {
        let mut reports = Vec::with_capacity(ContentType::ALL.len());
        for content_type in ContentType::ALL {
            reports.push((content_type, self.reconcile(content_type).await?));
        }
        Ok(reports)
    }

    /// Stage both documents, then commit them in the given order.
    async fn commit_pair(
        &self,
        content_type: ContentType,
        first: (Stage, &ContentCollection),
        second: (Stage, &ContentCollection),
    ) -> ContentResult<()> {
        let staged_first = self.store.stage(content_type, first.0, first.1).await?;
        let staged_second = self.store.stage(content_type, second.0, second.1).await?;
        staged_first.commit().await?;
        staged_second.commit().await?;
        Ok(())
    }

    async fn remove_images(
        &self,
        content_type: ContentType,
        post_id: &str,
        candidates: &BTreeSet<String>,
        still_referenced: &BTreeSet<String>,
    ) {
        let mut removed = Vec::new();
        for filename in candidates.difference(still_referenced) {
            if self.images.remove(filename).await.is_some() {
                removed.push(filename.clone());
            }
        }
        if !removed.is_empty() {
            tracing::info!(%content_type, id = post_id, count = removed.len(), "post images removed");
            self.emit(ContentEvent::ImagesRemoved(ImagesRemovedEvent {
                content_type,
                post_id: post_id.to_string(),
                filenames: removed,
                timestamp: Utc::now(),
            }));
        }
    }

    fn emit(&self, event: ContentEvent) {
        // No subscribers is fine.
        let _ = self.events.publish(event);
    }
}

fn not_found(content_type: ContentType, id: &str) -> ContentError {
    ContentError::NotFound {
        content_type,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DataLayout, RecoveryPolicy};
    use serde_json::json;

    struct Fixture {
        _dir: tempfile::TempDir,
        service: ContentService,
        layout: DataLayout,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        layout.bootstrap().await.unwrap();
        let events = EventBus::new(64);
        let store = ContentStore::new(layout.clone(), RecoveryPolicy::Empty, events.clone());
        let service = ContentService::new(
            store,
            ImageStore::new(layout.images_dir()),
            Arc::new(ContentLocks::new()),
            events,
        );
        Fixture {
            _dir: dir,
            service,
            layout,
        }
    }

    fn post(value: serde_json::Value) -> Post {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn save_assigns_id_and_timestamps() {
        let f = fixture().await;
        let saved = f
            .service
            .save(ContentType::Research, post(json!({ "title": "X" })))
            .await
            .unwrap();
        assert!(saved.id().is_some());
        assert_eq!(saved.status, Some(PostStatus::Draft));
        assert_eq!(saved.created_at, saved.updated_at);
        assert!(saved.published_at.is_none());
    }

    #[tokio::test]
    async fn resave_keeps_created_at_and_position() {
        let f = fixture().await;
        let first = f
            .service
            .save(ContentType::Media, post(json!({ "title": "first" })))
            .await
            .unwrap();
        f.service
            .save(ContentType::Media, post(json!({ "title": "second" })))
            .await
            .unwrap();

        let mut update = first.clone();
        update.fields.insert("title".into(), json!("first, revised"));
        update.created_at = None;
        let updated = f.service.save(ContentType::Media, update).await.unwrap();

        assert_eq!(updated.created_at, first.created_at);
        let drafts = f.service.list_drafts(ContentType::Media).await.unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].id(), first.id());
        assert_eq!(drafts[1].field("title"), Some(&json!("first, revised")));
    }

    #[tokio::test]
    async fn save_without_status_keeps_stored_status() {
        let f = fixture().await;
        let saved = f
            .service
            .save(ContentType::Shop, post(json!({ "title": "mug" })))
            .await
            .unwrap();
        let id = saved.id().unwrap().to_string();
        f.service.publish(ContentType::Shop, &id).await.unwrap();

        let mut update = post(json!({ "title": "mug v2" }));
        update.id = Some(id.clone());
        let updated = f.service.save(ContentType::Shop, update).await.unwrap();

        assert!(updated.is_published());
        let public = f.service.get_published(ContentType::Shop, &id).await.unwrap();
        assert_eq!(public.field("title"), Some(&json!("mug v2")));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let f = fixture().await;
        for result in [
            f.service.publish(ContentType::Activity, "nope").await,
            f.service.edit(ContentType::Activity, "nope").await,
            f.service.get_published(ContentType::Activity, "nope").await,
        ] {
            assert!(matches!(result, Err(ContentError::NotFound { .. })));
        }
    }

    #[tokio::test]
    async fn invalid_post_is_rejected_before_storage() {
        let f = fixture().await;
        let err = f
            .service
            .save(ContentType::Research, post(json!({ "id": "" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));
        assert!(f.service.list_drafts(ContentType::Research).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn shared_image_survives_removal_from_one_post() {
        let f = fixture().await;
        std::fs::write(f.layout.images_dir().join("shared.webp"), b"img").unwrap();
        let a = f
            .service
            .save(
                ContentType::Media,
                post(json!({ "images": ["/media/images/shared.webp"] })),
            )
            .await
            .unwrap();
        f.service
            .save(
                ContentType::Media,
                post(json!({ "images": ["/media/images/shared.webp"] })),
            )
            .await
            .unwrap();

        f.service
            .delete(ContentType::Media, a.id().unwrap())
            .await
            .unwrap();
        assert!(f.layout.images_dir().join("shared.webp").exists());
    }

    #[tokio::test]
    async fn reconcile_repairs_both_directions() {
        let f = fixture().await;
        let store = f.service.store();
        let drafts = ContentCollection::new(vec![
            post(json!({ "id": "live", "status": "published" })),
            post(json!({ "id": "hidden", "status": "draft" })),
        ]);
        let published = ContentCollection::new(vec![
            post(json!({ "id": "hidden", "status": "published" })),
            post(json!({ "id": "gone", "status": "published" })),
        ]);
        store
            .write(ContentType::Research, Stage::Draft, &drafts)
            .await
            .unwrap();
        store
            .write(ContentType::Research, Stage::Published, &published)
            .await
            .unwrap();

        let report = f.service.reconcile(ContentType::Research).await.unwrap();
        assert_eq!(report.dropped, vec!["hidden", "gone"]);
        assert_eq!(report.restored, vec!["live"]);

        let public = f.service.list_published(ContentType::Research).await.unwrap();
        let ids: Vec<_> = public.iter().filter_map(Post::id).collect();
        assert_eq!(ids, ["live"]);

        let again = f.service.reconcile(ContentType::Research).await.unwrap();
        assert!(again.is_clean());
    }

    #[tokio::test]
    async fn concurrent_saves_do_not_lose_updates() {
        let f = fixture().await;
        let mut tasks = Vec::new();
        for i in 0..16 {
            let service = f.service.clone();
            tasks.push(tokio::spawn(async move {
                service
                    .save(ContentType::Activity, post(json!({ "n": i })))
                    .await
                    .unwrap()
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let drafts = f.service.list_drafts(ContentType::Activity).await.unwrap();
        assert_eq!(drafts.len(), 16);
        let ids: BTreeSet<_> = drafts.iter().filter_map(Post::id).collect();
        assert_eq!(ids.len(), 16);
    }
}
