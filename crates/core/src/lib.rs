//! Content backend for a personal site: per-type draft and published JSON
//! documents, the draft/publish lifecycle over them, image bookkeeping, a
//! public chat log, and the admin's site configuration.

pub mod auth;
pub mod chat;
pub mod content;
pub mod error;
pub mod events;
pub mod images;
pub mod lifecycle;
pub mod site;
pub mod site_config;
pub mod store;

pub use content::{ContentCollection, ContentType, Post, PostStatus, Stage};
pub use error::{ContentError, ContentResult, StorageError};
pub use site::Site;
