use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blog_util::timestamp;

pub type ArticleId = i64;
pub type CommentId = i64;
pub type TagId = i64;

// MARK: Records

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    #[serde(default, with = "timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub dislikes: u32,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    /// Parent article. Filled in by the client when the backend leaves it out.
    #[serde(default)]
    pub article_id: Option<ArticleId>,
    pub content: String,
    #[serde(default, with = "timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

// MARK: Requests

/// Body of article creation and update.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ArticlePayload {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl ArticlePayload {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ArticleRef {
    pub id: ArticleId,
}

/// Body of comment creation.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NewComment {
    pub article: ArticleRef,
    pub content: String,
}

impl NewComment {
    pub fn new(article_id: ArticleId, content: impl Into<String>) -> Self {
        Self {
            article: ArticleRef { id: article_id },
            content: content.into(),
        }
    }
}

// MARK: Errors

/// Error envelope returned by the backend on rejected requests.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub status: Option<u16>,
    pub message: Option<String>,
    pub debug_message: Option<String>,
    pub timestamp: Option<String>,
}
