use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::timestamp;

/// Lifecycle state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

/// One content item. Only the reserved keys are typed; everything else the
/// caller sends is carried through untouched in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    /// Image URLs; the last path segment of each is the on-disk filename.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Post {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_published(&self) -> bool {
        self.status == Some(PostStatus::Published)
    }

    /// Caller-supplied field lookup, e.g. `title` or `content`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// The persisted `{ "posts": [...] }` document for one (content type, stage) pair.
///
/// Order is insertion order, newest first; nothing here re-sorts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentCollection {
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl ContentCollection {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.posts.iter().position(|p| p.id() == Some(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn find(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id() == Some(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id() == Some(id))
    }

    /// Replace the post with the same id in place, or insert it at the front.
    /// Returns the replaced post, if any.
    pub fn upsert(&mut self, post: Post) -> Option<Post> {
        match post.id().and_then(|id| self.position(id)) {
            Some(i) => Some(std::mem::replace(&mut self.posts[i], post)),
            None => {
                self.posts.insert(0, post);
                None
            }
        }
    }

    /// Drop every post carrying `id`, returning the first one removed.
    pub fn remove(&mut self, id: &str) -> Option<Post> {
        let removed = self.position(id).map(|i| self.posts[i].clone());
        self.posts.retain(|p| p.id() != Some(id));
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(id: &str) -> Post {
        serde_json::from_value(json!({ "id": id, "status": "draft" })).unwrap()
    }

    #[test]
    fn extra_fields_survive_round_trip() {
        let raw = json!({
            "id": "1",
            "status": "published",
            "title": "Hello",
            "tags": ["a", "b"],
            "images": ["/media/images/x.webp"]
        });
        let post: Post = serde_json::from_value(raw.clone()).unwrap();
        assert!(post.is_published());
        assert_eq!(post.field("title"), Some(&json!("Hello")));
        assert_eq!(serde_json::to_value(&post).unwrap(), raw);
    }

    #[test]
    fn timestamps_without_offset_are_read_as_utc() {
        let post: Post = serde_json::from_value(json!({
            "id": "1",
            "created_at": "2024-05-01T10:00:00.123456",
            "updated_at": "2024-05-01T11:00:00+00:00",
            "published_at": null
        }))
        .unwrap();
        assert_eq!(
            post.created_at.unwrap().to_rfc3339(),
            "2024-05-01T10:00:00.123456+00:00"
        );
        assert!(post.updated_at.is_some());
        assert!(post.published_at.is_none());
    }

    #[test]
    fn unparseable_timestamp_is_an_error() {
        let res = serde_json::from_value::<Post>(json!({ "id": "1", "created_at": "soon" }));
        assert!(res.is_err());
    }

    #[test]
    fn missing_posts_key_reads_as_empty() {
        let c: ContentCollection = serde_json::from_str("{}").unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn upsert_inserts_new_posts_at_front() {
        let mut c = ContentCollection::default();
        c.upsert(post("a"));
        c.upsert(post("b"));
        let ids: Vec<_> = c.posts.iter().filter_map(Post::id).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut c = ContentCollection::new(vec![post("a"), post("b")]);
        let mut updated = post("b");
        updated.fields.insert("title".into(), json!("new"));
        let old = c.upsert(updated).unwrap();
        assert!(old.field("title").is_none());
        assert_eq!(c.posts[1].field("title"), Some(&json!("new")));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn remove_drops_duplicates() {
        let mut c = ContentCollection::new(vec![post("a"), post("b"), post("a")]);
        assert!(c.remove("a").is_some());
        assert_eq!(c.len(), 1);
        assert!(c.remove("a").is_none());
    }
}
