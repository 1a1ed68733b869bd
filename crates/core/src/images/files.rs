use std::path::{Path, PathBuf};

use crate::content::validate::is_plain_filename;
use crate::error::StorageError;

/// Extensions the cleanup scanner considers image files.
pub const IMAGE_EXTENSIONS: [&str; 2] = ["webp", "gif"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub filename: String,
    pub size: u64,
}

/// The images directory served under `/media/images/`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Image files currently on disk. A missing directory holds no images.
    pub async fn list(&self) -> Result<Vec<ImageFile>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(&self.dir, e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&self.dir, e))?
        {
            let Ok(filename) = entry.file_name().into_string() else {
                continue;
            };
            if !has_image_extension(&filename) {
                continue;
            }
            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(StorageError::io(entry.path(), e)),
            };
            files.push(ImageFile {
                filename,
                size: metadata.len(),
            });
        }
        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(files)
    }

    /// Best-effort delete. Returns the bytes freed, or `None` when nothing
    /// was removed. A missing file is not an error; other failures are logged.
    pub async fn remove(&self, filename: &str) -> Option<u64> {
        if !is_plain_filename(filename) {
            tracing::warn!(filename, "refusing to delete image outside images directory");
            return None;
        }
        let path = self.dir.join(filename);
        let size = tokio::fs::metadata(&path).await.ok()?.len();
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(filename, size, "image deleted");
                Some(size)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(filename, "failed to delete image: {e}");
                None
            }
        }
    }
}

fn has_image_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(files: &[(&str, usize)]) -> (tempfile::TempDir, ImageStore) {
        let dir = tempfile::tempdir().unwrap();
        for (name, len) in files {
            std::fs::write(dir.path().join(name), vec![0u8; *len]).unwrap();
        }
        let store = ImageStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn lists_only_known_extensions() {
        let (_dir, store) = store_with(&[
            ("a.webp", 3),
            ("b.GIF", 5),
            ("notes.txt", 1),
            ("c.png", 1),
        ]);
        let files = store.list().await.unwrap();
        assert_eq!(
            files,
            vec![
                ImageFile { filename: "a.webp".into(), size: 3 },
                ImageFile { filename: "b.GIF".into(), size: 5 },
            ]
        );
    }

    #[tokio::test]
    async fn missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("absent"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_reports_freed_bytes() {
        let (dir, store) = store_with(&[("a.webp", 7)]);
        assert_eq!(store.remove("a.webp").await, Some(7));
        assert!(!dir.path().join("a.webp").exists());
        assert_eq!(store.remove("a.webp").await, None);
    }

    #[tokio::test]
    async fn remove_refuses_traversal() {
        let root = tempfile::tempdir().unwrap();
        let images = root.path().join("images");
        std::fs::create_dir(&images).unwrap();
        std::fs::write(root.path().join("secret.webp"), b"x").unwrap();

        let store = ImageStore::new(&images);
        assert_eq!(store.remove("..").await, None);
        assert_eq!(store.remove("../secret.webp").await, None);
        assert!(root.path().join("secret.webp").exists());
    }
}
