// The backend as seen by the view state. `BlogClient` is the real implementation;
// tests substitute an in-memory one.

use async_trait::async_trait;

use blog_client::{Article, ArticleId, ArticlePayload, BlogClient, Comment, NewComment, Result, Tag, TagId};

#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn all_articles(&self) -> Result<Vec<Article>>;
    async fn articles_by_tag(&self, tag_name: &str) -> Result<Vec<Article>>;
    async fn article(&self, id: ArticleId) -> Result<Article>;
    async fn create_article(&self, payload: &ArticlePayload) -> Result<Article>;
    async fn update_article(&self, id: ArticleId, payload: &ArticlePayload) -> Result<Article>;
    async fn delete_article(&self, id: ArticleId) -> Result<()>;
    async fn like(&self, id: ArticleId) -> Result<Article>;
    async fn dislike(&self, id: ArticleId) -> Result<Article>;

    async fn comments_by_article(&self, article_id: ArticleId) -> Result<Vec<Comment>>;
    async fn create_comment(&self, comment: &NewComment) -> Result<Comment>;

    async fn all_tags(&self) -> Result<Vec<Tag>>;
    async fn article_tags(&self, article_id: ArticleId) -> Result<Vec<Tag>>;
    async fn attach_tag(&self, article_id: ArticleId, tag_id: TagId) -> Result<Article>;
    async fn detach_tag(&self, article_id: ArticleId, tag_id: TagId) -> Result<Article>;
}

#[async_trait]
impl BlogApi for BlogClient {
    async fn all_articles(&self) -> Result<Vec<Article>> {
        BlogClient::all_articles(self).await
    }

    async fn articles_by_tag(&self, tag_name: &str) -> Result<Vec<Article>> {
        BlogClient::articles_by_tag(self, tag_name).await
    }

    async fn article(&self, id: ArticleId) -> Result<Article> {
        BlogClient::article(self, id).await
    }

    async fn create_article(&self, payload: &ArticlePayload) -> Result<Article> {
        BlogClient::create_article(self, payload).await
    }

    async fn update_article(&self, id: ArticleId, payload: &ArticlePayload) -> Result<Article> {
        BlogClient::update_article(self, id, payload).await
    }

    async fn delete_article(&self, id: ArticleId) -> Result<()> {
        BlogClient::delete_article(self, id).await
    }

    async fn like(&self, id: ArticleId) -> Result<Article> {
        BlogClient::like(self, id).await
    }

    async fn dislike(&self, id: ArticleId) -> Result<Article> {
        BlogClient::dislike(self, id).await
    }

    async fn comments_by_article(&self, article_id: ArticleId) -> Result<Vec<Comment>> {
        BlogClient::comments_by_article(self, article_id).await
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment> {
        BlogClient::create_comment(self, comment).await
    }

    async fn all_tags(&self) -> Result<Vec<Tag>> {
        BlogClient::all_tags(self).await
    }

    async fn article_tags(&self, article_id: ArticleId) -> Result<Vec<Tag>> {
        BlogClient::article_tags(self, article_id).await
    }

    async fn attach_tag(&self, article_id: ArticleId, tag_id: TagId) -> Result<Article> {
        BlogClient::attach_tag(self, article_id, tag_id).await
    }

    async fn detach_tag(&self, article_id: ArticleId, tag_id: TagId) -> Result<Article> {
        BlogClient::detach_tag(self, article_id, tag_id).await
    }
}
