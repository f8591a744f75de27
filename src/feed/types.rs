use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-side feed identifier.
pub type FeedId = i64;

/// Pending feed identifiers in server ranking order.
pub type Queue = Vec<FeedId>;

/// Which ranking source the home feed uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    #[default]
    All,
    Following,
}

impl FeedType {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "following" => Some(Self::Following),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Following => "following",
        }
    }

    /// Label shown on the toggle.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All feeds",
            Self::Following => "Following",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::All => Self::Following,
            Self::Following => Self::All,
        }
    }
}

/// Feed payload as the batch endpoint returns it.
///
/// Only `id` and `likes` are interpreted; everything else rides along in
/// `extra` for the processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFeed {
    pub id: FeedId,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A materialized, display-ready feed entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub id: FeedId,
    /// User ids that liked this feed. Treated as a set; insertion order kept
    /// for stable rendering.
    pub likes: Vec<String>,
    pub author: Option<String>,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
    /// Remaining presentational fields, untouched by the pager.
    pub payload: Map<String, Value>,
}

impl FeedItem {
    pub fn new(id: FeedId) -> Self {
        Self {
            id,
            likes: Vec::new(),
            author: None,
            content: String::new(),
            created_at: None,
            payload: Map::new(),
        }
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|l| l == user_id)
    }
}
