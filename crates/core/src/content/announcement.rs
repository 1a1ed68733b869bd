use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::model::{Post, PostStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum AnnouncementItem {
    Text(Value),
    Image(String),
}

/// Public rendering of the newest published announcement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnouncementView {
    pub items: Vec<AnnouncementItem>,
    pub status: PostStatus,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AnnouncementView {
    /// Build the view from the published announcement collection (newest first).
    pub fn from_published(posts: &[Post]) -> Self {
        let Some(latest) = posts.iter().find(|p| p.is_published()) else {
            return Self {
                items: Vec::new(),
                status: PostStatus::Draft,
                updated_at: None,
            };
        };

        let mut items = Vec::with_capacity(latest.images.len() + 1);
        if let Some(text) = latest.field("content").filter(|v| is_present(v)) {
            items.push(AnnouncementItem::Text(text.clone()));
        }
        items.extend(latest.images.iter().cloned().map(AnnouncementItem::Image));

        Self {
            items,
            status: PostStatus::Published,
            updated_at: latest.updated_at,
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_collection_renders_draft() {
        let view = AnnouncementView::from_published(&[]);
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({ "items": [], "status": "draft", "updated_at": null })
        );
    }

    #[test]
    fn renders_text_then_images_of_newest() {
        let posts: Vec<Post> = serde_json::from_value(json!([
            {
                "id": "2",
                "status": "published",
                "content": "Closed on Monday",
                "images": ["/media/images/a.webp"],
                "updated_at": "2024-05-01T10:00:00Z"
            },
            { "id": "1", "status": "published", "content": "older" }
        ]))
        .unwrap();

        let view = AnnouncementView::from_published(&posts);
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({
                "items": [
                    { "type": "text", "content": "Closed on Monday" },
                    { "type": "image", "content": "/media/images/a.webp" }
                ],
                "status": "published",
                "updated_at": "2024-05-01T10:00:00Z"
            })
        );
    }

    #[test]
    fn skips_empty_text() {
        let posts: Vec<Post> = serde_json::from_value(json!([
            { "id": "1", "status": "published", "content": "", "images": ["x.gif"] }
        ]))
        .unwrap();
        let view = AnnouncementView::from_published(&posts);
        assert_eq!(view.items, vec![AnnouncementItem::Image("x.gif".into())]);
    }
}
