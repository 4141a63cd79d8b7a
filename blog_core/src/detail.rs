use blog_client::{Article, ArticleId, Comment, Tag};

use crate::error::Result;
use crate::list::sort_comments;
use crate::notice::NoticeScope;
use crate::state::BlogState;

/// One article with both of its child collections.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleDetail {
    pub article: Article,
    /// Newest first.
    pub comments: Vec<Comment>,
    pub tags: Vec<Tag>,
}

impl BlogState {
    /// Fetch an article, its comments and its tags concurrently.
    /// The collections also seed the child caches of that article.
    pub async fn load_detail(&self, id: ArticleId) -> Result<ArticleDetail> {
        let result = futures::try_join!(
            self.api.article(id),
            self.api.comments_by_article(id),
            self.api.article_tags(id),
        );

        let mut view = self.view.write().await;
        match result {
            Ok((article, comments, tags)) => {
                let comments = sort_comments(comments);
                view.comments.seed(id, comments.clone());
                view.tags.seed(id, tags.clone());
                view.notices.clear_scope(NoticeScope::Banner);
                Ok(ArticleDetail { article, comments, tags })
            }
            Err(e) => {
                tracing::warn!("Cannot load article {}: {}", id, e);
                let message = format!("Cannot load article {}: {}", id, e.user_message());
                view.notices.push(NoticeScope::Banner, message, None);
                Err(e.into())
            }
        }
    }
}
