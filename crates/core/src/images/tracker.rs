//! Derives which image files posts refer to.
//!
//! Always recomputed from the content documents; nothing is cached.

use std::collections::BTreeSet;

use crate::content::{ContentCollection, ContentType, Post, Stage};
use crate::error::StorageError;
use crate::store::ContentStore;

/// Final path segment of an image URL: `/media/images/a.webp` -> `a.webp`.
pub fn filename_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Filenames referenced by the `images` lists of `posts`.
pub fn image_filenames<'a>(posts: impl IntoIterator<Item = &'a Post>) -> BTreeSet<String> {
    posts
        .into_iter()
        .flat_map(|p| p.images.iter())
        .map(|url| filename_from_url(url).to_string())
        .collect()
}

/// Filenames in `old` that no longer appear in `new`.
pub fn diff(old: &[String], new: &[String]) -> BTreeSet<String> {
    let old = image_filenames_of(old);
    let new = image_filenames_of(new);
    old.difference(&new).cloned().collect()
}

/// Union of the images referenced by an already-loaded draft/published pair.
pub fn referenced_in(drafts: &ContentCollection, published: &ContentCollection) -> BTreeSet<String> {
    image_filenames(drafts.posts.iter().chain(published.posts.iter()))
}

/// Images referenced by any post of `content_type`, drafts and published alike.
pub async fn referenced_images(
    store: &ContentStore,
    content_type: ContentType,
) -> Result<BTreeSet<String>, StorageError> {
    let drafts = store.read(content_type, Stage::Draft).await?;
    let published = store.read(content_type, Stage::Published).await?;
    Ok(referenced_in(&drafts, &published))
}

/// Images referenced anywhere on the site.
pub async fn referenced_images_everywhere(
    store: &ContentStore,
) -> Result<BTreeSet<String>, StorageError> {
    let mut all = BTreeSet::new();
    for content_type in ContentType::ALL {
        all.extend(referenced_images(store, content_type).await?);
    }
    Ok(all)
}

fn image_filenames_of(urls: &[String]) -> BTreeSet<String> {
    urls.iter()
        .map(|url| filename_from_url(url).to_string())
        .collect()
}
