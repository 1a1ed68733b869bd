pub mod announcement;
pub mod content_type;
pub mod id;
pub mod model;
pub(crate) mod timestamp;
pub mod validate;

pub use content_type::{ContentType, Stage};
pub use model::{ContentCollection, Post, PostStatus};
