use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl Default for PostStatus {
    fn default() -> Self {
        PostStatus::Published
    }
}

/// The persisted content document. Serialized camelCase to match the wire
/// contract (`createdAt`, `readTime`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    pub author: String,
    pub date: DateTime<Utc>,
    pub read_time: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: PostStatus,
    // Read-model decorations. Never mutated by any operation here and
    // preserved verbatim across updates.
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Write-intent copy of a post: every mutable field, no id or audit
/// timestamps. Updates are full-replace, so the payload always carries the
/// complete set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostPayload {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: String,
    pub content: String,
    pub author: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub read_time: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub image: String,
    pub featured: bool,
    pub status: PostStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilter {
    pub status: Option<PostStatus>,
    /// 1-based page index.
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub items: Vec<BlogPost>,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StoreStats {
    pub total: usize,
    pub featured: usize,
    pub regular: usize,
    pub limit: usize,
    /// `limit - total`; negative once the soft cap is exceeded.
    pub remaining: i64,
}
