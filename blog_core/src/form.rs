use std::collections::BTreeSet;

use blog_client::{Article, ArticleId, ArticlePayload, Tag, TagId};

use crate::confirm::Confirm;
use crate::dispatch::Action;
use crate::error::{Error, Result};

/// Longest article body the backend accepts, in characters.
pub const MAX_CONTENT_CHARS: usize = 5000;

pub fn validate_article(payload: &ArticlePayload) -> Result<()> {
    if payload.title.trim().is_empty() || payload.content.trim().is_empty() {
        return Err(Error::Validation("Title and content must not be empty".to_string()));
    }
    let chars = payload.content.chars().count();
    if chars > MAX_CONTENT_CHARS {
        return Err(Error::Validation(format!(
            "Content is {} characters long, at most {} are allowed",
            chars, MAX_CONTENT_CHARS
        )));
    }
    Ok(())
}

pub fn validate_comment(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::Validation("Comment must not be empty".to_string()));
    }
    Ok(())
}

/// Catalog tags not yet in `attached`, in catalog order.
pub fn available_tags(catalog: &[Tag], attached: &[Tag]) -> Vec<Tag> {
    catalog
        .iter()
        .filter(|tag| !attached.iter().any(|a| a.id == tag.id))
        .cloned()
        .collect()
}

/// Draft of a new or edited article.
#[derive(Debug, Clone, Default)]
pub struct ArticleForm {
    editing: Option<ArticleId>,
    pub title: String,
    pub content: String,
    tags: Vec<Tag>,
    initial: (String, String, BTreeSet<TagId>),
}

impl ArticleForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(article: &Article) -> Self {
        Self {
            editing: Some(article.id),
            title: article.title.clone(),
            content: article.content.clone(),
            tags: article.tags.clone(),
            initial: (
                article.title.clone(),
                article.content.clone(),
                article.tags.iter().map(|t| t.id).collect(),
            ),
        }
    }

    pub fn editing(&self) -> Option<ArticleId> {
        self.editing
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Add a tag unless it is already selected. Returns whether it was added.
    pub fn add_tag(&mut self, tag: Tag) -> bool {
        if self.tags.iter().any(|t| t.id == tag.id) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn remove_tag(&mut self, id: TagId) {
        self.tags.retain(|t| t.id != id);
    }

    /// Catalog tags that can still be added.
    pub fn available_tags(&self, catalog: &[Tag]) -> Vec<Tag> {
        available_tags(catalog, &self.tags)
    }

    pub fn is_dirty(&self) -> bool {
        let (title, content, tag_ids) = &self.initial;
        let current: BTreeSet<TagId> = self.tags.iter().map(|t| t.id).collect();
        self.title != *title || self.content != *content || current != *tag_ids
    }

    /// Whether the form may be abandoned. Unsaved changes need the user's consent.
    pub async fn confirm_cancel(&self, confirm: &dyn Confirm) -> bool {
        if !self.is_dirty() {
            return true;
        }
        confirm.confirm("Discard unsaved changes?").await
    }

    pub fn payload(&self) -> ArticlePayload {
        ArticlePayload::new(self.title.clone(), self.content.clone()).with_tags(self.tags.clone())
    }

    /// Validate and turn the draft into the matching mutation.
    pub fn to_action(&self) -> Result<Action> {
        let payload = self.payload();
        validate_article(&payload)?;
        Ok(match self.editing {
            Some(article_id) => Action::UpdateArticle { article_id, payload },
            None => Action::CreateArticle(payload),
        })
    }
}
