use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// The fixed categories that partition posts into independent storage documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Research,
    Media,
    Activity,
    Shop,
    Announcement,
}

impl ContentType {
    /// Every content type, in lock-acquisition order.
    pub const ALL: [ContentType; 5] = [
        ContentType::Research,
        ContentType::Media,
        ContentType::Activity,
        ContentType::Shop,
        ContentType::Announcement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Research => "research",
            ContentType::Media => "media",
            ContentType::Activity => "activity",
            ContentType::Shop => "shop",
            ContentType::Announcement => "announcement",
        }
    }

    /// Position in [`ContentType::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|ct| ct.as_str() == s)
            .ok_or_else(|| ContentError::InvalidContentType(s.to_string()))
    }
}

/// Which of the two per-type documents is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Draft,
    Published,
}

impl Stage {
    /// Directory under `admin_data/` holding this stage's documents.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Stage::Draft => "drafts",
            Stage::Published => "published",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Draft => f.write_str("draft"),
            Stage::Published => f.write_str("published"),
        }
    }
}
