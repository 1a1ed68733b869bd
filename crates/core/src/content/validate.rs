//! Incoming post validation.

use thiserror::Error;

use super::model::Post;
use crate::images::tracker::filename_from_url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("post id cannot be empty")]
    EmptyId,
    #[error("post id cannot contain '/': {0}")]
    InvalidId(String),
    #[error("image url does not name a file: {0}")]
    InvalidImageUrl(String),
}

/// Check the caller-controlled reserved fields of a post before it is saved.
pub fn validate_post(post: &Post) -> Result<(), ValidationError> {
    match post.id() {
        Some("") => return Err(ValidationError::EmptyId),
        Some(id) if id.contains('/') => return Err(ValidationError::InvalidId(id.to_string())),
        _ => {}
    }
    for url in &post.images {
        if !is_plain_filename(filename_from_url(url)) {
            return Err(ValidationError::InvalidImageUrl(url.clone()));
        }
    }
    Ok(())
}

/// A filename that resolves inside the images directory.
pub fn is_plain_filename(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
