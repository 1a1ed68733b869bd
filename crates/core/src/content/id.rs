//! Post ID generation.
//!
//! Generated IDs are the UTC creation instant rendered as
//! `YYYYMMDDhhmmss` followed by six digits of microseconds, e.g.
//! `20240501123045000123`. Fixed width keeps lexicographic order equal
//! to creation order.

use chrono::{DateTime, Duration, Utc};

use super::model::ContentCollection;

const ID_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// Render the ID for a given instant.
pub fn id_for_instant(at: DateTime<Utc>) -> String {
    at.format(ID_FORMAT).to_string()
}

/// Produce an ID not yet present in `drafts`, starting from `at` and
/// stepping forward one microsecond on collision.
pub fn generate_id(at: DateTime<Utc>, drafts: &ContentCollection) -> String {
    let mut instant = at;
    loop {
        let id = id_for_instant(instant);
        if !drafts.contains(&id) {
            return id;
        }
        instant += Duration::microseconds(1);
    }
}
