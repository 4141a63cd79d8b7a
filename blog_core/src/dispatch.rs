use blog_client::{ArticleId, ArticlePayload, NewComment, Tag, TagId};

use crate::cache::ChildKind;
use crate::error::{Error, Result};
use crate::form::{validate_article, validate_comment, ArticleForm};
use crate::list::Reaction;
use crate::notice::NoticeScope;
use crate::state::{attached_tags, BlogEvent, BlogState};

/// A state-changing request to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Like(ArticleId),
    Dislike(ArticleId),
    /// Needs the user's confirmation before anything is sent.
    Delete(ArticleId),
    CreateComment { article_id: ArticleId, content: String },
    AttachTag { article_id: ArticleId, tag: Tag },
    DetachTag { article_id: ArticleId, tag_id: TagId },
    CreateArticle(ArticlePayload),
    UpdateArticle { article_id: ArticleId, payload: ArticlePayload },
}

impl Action {
    fn describe(&self) -> String {
        match self {
            Action::Like(id) => format!("like article {}", id),
            Action::Dislike(id) => format!("dislike article {}", id),
            Action::Delete(id) => format!("delete article {}", id),
            Action::CreateComment { article_id, .. } => format!("comment on article {}", article_id),
            Action::AttachTag { article_id, tag } => format!("add tag \"{}\" to article {}", tag.name, article_id),
            Action::DetachTag { article_id, tag_id } => format!("remove tag {} from article {}", tag_id, article_id),
            Action::CreateArticle(_) => "create article".to_string(),
            Action::UpdateArticle { article_id, .. } => format!("save article {}", article_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Completed,
    /// The user declined the confirmation; nothing was sent.
    Declined,
}

impl BlogState {
    /// Run a mutation and bring the local state in line with it.
    /// Failures raise a notice and are returned; nothing is retried.
    pub async fn dispatch(&self, action: Action) -> Result<DispatchOutcome> {
        if let Err(e) = self.validate(&action).await {
            tracing::debug!("Rejected {}: {}", action.describe(), e);
            self.raise(NoticeScope::Form, &e).await;
            return Err(e);
        }

        let result = match &action {
            Action::Like(id) => self.react(*id, Reaction::Like).await,
            Action::Dislike(id) => self.react(*id, Reaction::Dislike).await,
            Action::Delete(id) => self.delete(*id).await,
            Action::CreateComment { article_id, content } => self.comment(*article_id, content).await,
            Action::AttachTag { article_id, tag } => self.attach(*article_id, tag).await,
            Action::DetachTag { article_id, tag_id } => self.detach(*article_id, *tag_id).await,
            Action::CreateArticle(payload) => self.save(None, payload).await,
            Action::UpdateArticle { article_id, payload } => self.save(Some(*article_id), payload).await,
        };

        match result {
            Ok(outcome) => {
                tracing::debug!("Dispatched {}: {:?}", action.describe(), outcome);
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!("Cannot {}: {}", action.describe(), e);
                self.view.write().await.notices.push(
                    NoticeScope::Toast,
                    format!("Cannot {}: {}", action.describe(), e.user_message()),
                    self.notice_ttl(),
                );
                Err(e)
            }
        }
    }

    /// Validate a form and dispatch it. Saving an edit asks for confirmation first.
    pub async fn submit_form(&self, form: &ArticleForm) -> Result<DispatchOutcome> {
        let action = match form.to_action() {
            Ok(action) => action,
            Err(e) => {
                self.raise(NoticeScope::Form, &e).await;
                return Err(e);
            }
        };
        if form.editing().is_some() && !self.confirm.confirm("Save changes to this article?").await {
            return Ok(DispatchOutcome::Declined);
        }
        self.dispatch(action).await
    }

    async fn validate(&self, action: &Action) -> Result<()> {
        match action {
            Action::CreateComment { content, .. } => validate_comment(content),
            Action::CreateArticle(payload) | Action::UpdateArticle { payload, .. } => validate_article(payload),
            Action::AttachTag { article_id, tag } => {
                let view = self.view.read().await;
                if attached_tags(&view, *article_id).iter().any(|t| t.id == tag.id) {
                    return Err(Error::Validation(format!("Tag \"{}\" is already attached", tag.name)));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Optimistic: bump first, then take the server's count, or revert the bump on failure.
    async fn react(&self, id: ArticleId, reaction: Reaction) -> Result<DispatchOutcome> {
        let bumped = self.view.write().await.articles.bump(id, reaction);

        let result = match reaction {
            Reaction::Like => self.api.like(id).await,
            Reaction::Dislike => self.api.dislike(id).await,
        };

        let mut view = self.view.write().await;
        match result {
            Ok(article) => {
                view.articles.set_counter(id, reaction, reaction.value(&article));
                Ok(DispatchOutcome::Completed)
            }
            Err(e) => {
                if let Some(since) = bumped {
                    if !view.articles.unbump(id, reaction, since) {
                        tracing::debug!("Keeping server counters of article {} over rollback", id);
                    }
                }
                Err(e.into())
            }
        }
    }

    async fn delete(&self, id: ArticleId) -> Result<DispatchOutcome> {
        let prompt = format!("Delete article {}? This cannot be undone.", id);
        if !self.confirm.confirm(&prompt).await {
            tracing::debug!("Deletion of article {} declined", id);
            return Ok(DispatchOutcome::Declined);
        }

        self.api.delete_article(id).await?;

        {
            let mut view = self.view.write().await;
            view.articles.remove(id);
            view.comments.remove(id);
            view.tags.remove(id);
            view.expansion.remove(id);
            view.notices.clear_article(id);
        }
        let _ = self.events.send(BlogEvent::ArticleDeleted(id));
        Ok(DispatchOutcome::Completed)
    }

    async fn comment(&self, article_id: ArticleId, content: &str) -> Result<DispatchOutcome> {
        self.api
            .create_comment(&NewComment::new(article_id, content.trim()))
            .await?;
        self.invalidate(article_id, ChildKind::Comments).await;
        Ok(DispatchOutcome::Completed)
    }

    async fn attach(&self, article_id: ArticleId, tag: &Tag) -> Result<DispatchOutcome> {
        let article = self.api.attach_tag(article_id, tag.id).await?;
        self.view.write().await.articles.set_tags(article_id, article.tags);
        self.invalidate(article_id, ChildKind::Tags).await;
        Ok(DispatchOutcome::Completed)
    }

    async fn detach(&self, article_id: ArticleId, tag_id: TagId) -> Result<DispatchOutcome> {
        let article = self.api.detach_tag(article_id, tag_id).await?;
        self.view.write().await.articles.set_tags(article_id, article.tags);
        self.invalidate(article_id, ChildKind::Tags).await;
        Ok(DispatchOutcome::Completed)
    }

    /// Multi-field change: no local patching, the list is reloaded through the refresh flag.
    async fn save(&self, id: Option<ArticleId>, payload: &ArticlePayload) -> Result<DispatchOutcome> {
        let article = match id {
            Some(id) => self.api.update_article(id, payload).await?,
            None => self.api.create_article(payload).await?,
        };
        let _ = self.events.send(BlogEvent::ArticleSaved(article.id));
        self.request_refresh();
        Ok(DispatchOutcome::Completed)
    }
}
