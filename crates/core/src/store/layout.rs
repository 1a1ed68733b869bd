use std::path::{Path, PathBuf};

use crate::chat::ChatDocument;
use crate::content::{ContentCollection, ContentType, Stage};
use crate::error::StorageError;

use super::document::write_json;

/// On-disk layout of the site data, rooted at one directory:
///
/// ```text
/// admin_data/
///   drafts/<type>.json
///   published/<type>.json
///   images/
///   config.json
/// user_data/
///   chat_messages.json
/// ```
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn admin_dir(&self) -> PathBuf {
        self.root.join("admin_data")
    }

    pub fn stage_dir(&self, stage: Stage) -> PathBuf {
        self.admin_dir().join(stage.dir_name())
    }

    pub fn document_path(&self, content_type: ContentType, stage: Stage) -> PathBuf {
        self.stage_dir(stage)
            .join(format!("{}.json", content_type.as_str()))
    }

    pub fn images_dir(&self) -> PathBuf {
        self.admin_dir().join("images")
    }

    pub fn site_config_path(&self) -> PathBuf {
        self.admin_dir().join("config.json")
    }

    pub fn chat_path(&self) -> PathBuf {
        self.root.join("user_data").join("chat_messages.json")
    }

    /// Create every directory and seed empty documents for those missing.
    /// Existing files are left alone.
    pub async fn bootstrap(&self) -> Result<(), StorageError> {
        for dir in [
            self.stage_dir(Stage::Draft),
            self.stage_dir(Stage::Published),
            self.images_dir(),
        ] {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| StorageError::io(&dir, e))?;
        }

        for content_type in ContentType::ALL {
            for stage in [Stage::Draft, Stage::Published] {
                let path = self.document_path(content_type, stage);
                if !exists(&path).await? {
                    write_json(&path, &ContentCollection::default()).await?;
                }
            }
        }

        let chat = self.chat_path();
        if !exists(&chat).await? {
            write_json(&chat, &ChatDocument::default()).await?;
        }

        tracing::debug!(root = %self.root.display(), "data directories ready");
        Ok(())
    }
}

async fn exists(path: &Path) -> Result<bool, StorageError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| StorageError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bootstrap_seeds_every_document() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        layout.bootstrap().await.unwrap();

        for ct in ContentType::ALL {
            for stage in [Stage::Draft, Stage::Published] {
                let raw = std::fs::read_to_string(layout.document_path(ct, stage)).unwrap();
                let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
                assert_eq!(doc, serde_json::json!({ "posts": [] }));
            }
        }
        assert!(layout.images_dir().is_dir());
        assert!(layout.chat_path().is_file());
    }

    #[tokio::test]
    async fn bootstrap_keeps_existing_documents() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        let path = layout.document_path(ContentType::Shop, Stage::Draft);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"posts":[{"id":"keep"}]}"#).unwrap();

        layout.bootstrap().await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("keep"));
    }

    #[test]
    fn paths_follow_convention() {
        let layout = DataLayout::new("/srv/site");
        assert_eq!(
            layout.document_path(ContentType::Research, Stage::Published),
            PathBuf::from("/srv/site/admin_data/published/research.json")
        );
        assert_eq!(
            layout.document_path(ContentType::Media, Stage::Draft),
            PathBuf::from("/srv/site/admin_data/drafts/media.json")
        );
    }
}
