mod config;
mod error;
mod result;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use std::path::PathBuf;

pub use crate::config::*;
pub use crate::error::{Error, Result};
pub use crate::result::*;

/// Client of the blog REST backend.
#[derive(Debug, Clone)]
pub struct BlogClient {
    client: reqwest::Client,
    base_url: Url,
    log_dir: Option<PathBuf>,
}

impl BlogClient {
    pub fn new(config: &ClientConfig) -> Result<BlogClient> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(BlogClient {
            client,
            base_url: config.base_url.clone(),
            log_dir: config.log_dir.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // MARK: Articles

    pub async fn all_articles(&self) -> Result<Vec<Article>> {
        self.get_list("articles/all", &[]).await
    }

    pub async fn articles_by_tag(&self, tag_name: &str) -> Result<Vec<Article>> {
        self.get_list("articles/by-tag", &[("tagName", tag_name)]).await
    }

    pub async fn article(&self, id: ArticleId) -> Result<Article> {
        let request = self.request(Method::GET, &format!("articles/{}", id), &[])?;
        self.send(request).await
    }

    pub async fn create_article(&self, payload: &ArticlePayload) -> Result<Article> {
        let request = self.request(Method::POST, "articles/create", &[])?.json(payload);
        self.send(request).await
    }

    pub async fn update_article(&self, id: ArticleId, payload: &ArticlePayload) -> Result<Article> {
        let request = self.request(Method::PUT, &format!("articles/{}", id), &[])?.json(payload);
        self.send(request).await
    }

    pub async fn delete_article(&self, id: ArticleId) -> Result<()> {
        let request = self.request(Method::DELETE, &format!("articles/{}", id), &[])?;
        self.execute(request).await?;
        Ok(())
    }

    /// Returns the article with its updated counters.
    pub async fn like(&self, id: ArticleId) -> Result<Article> {
        let request = self.request(Method::POST, &format!("articles/{}/like", id), &[])?;
        self.send(request).await
    }

    /// Returns the article with its updated counters.
    pub async fn dislike(&self, id: ArticleId) -> Result<Article> {
        let request = self.request(Method::POST, &format!("articles/{}/dislike", id), &[])?;
        self.send(request).await
    }

    // MARK: Comments

    pub async fn comments_by_article(&self, article_id: ArticleId) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .get_list(&format!("comments/by-article/{}", article_id), &[])
            .await?;
        for comment in comments.iter_mut() {
            comment.article_id.get_or_insert(article_id);
        }
        Ok(comments)
    }

    pub async fn create_comment(&self, comment: &NewComment) -> Result<Comment> {
        let request = self.request(Method::POST, "comments/create", &[])?.json(comment);
        let mut created: Comment = self.send(request).await?;
        created.article_id.get_or_insert(comment.article.id);
        Ok(created)
    }

    // MARK: Tags

    pub async fn all_tags(&self) -> Result<Vec<Tag>> {
        self.get_list("tags/all", &[]).await
    }

    pub async fn article_tags(&self, article_id: ArticleId) -> Result<Vec<Tag>> {
        self.get_list(&format!("articles/{}/tags", article_id), &[]).await
    }

    /// Returns the article with its updated tag set.
    pub async fn attach_tag(&self, article_id: ArticleId, tag_id: TagId) -> Result<Article> {
        let path = format!("articles/{}/tags/{}", article_id, tag_id);
        let request = self.request(Method::PUT, &path, &[])?;
        self.send(request).await
    }

    /// Returns the article with its updated tag set.
    pub async fn detach_tag(&self, article_id: ArticleId, tag_id: TagId) -> Result<Article> {
        let path = format!("articles/{}/tags/{}", article_id, tag_id);
        let request = self.request(Method::DELETE, &path, &[])?;
        self.send(request).await
    }
}

impl BlogClient {
    fn request(&self, method: Method, path: &str, query: &[(&str, &str)]) -> Result<RequestBuilder> {
        let mut url = self.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        tracing::debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    async fn get_list<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path, query)?;
        let (name, content) = self.execute(request).await?;
        if content.trim().is_empty() {
            return Ok(vec![]);
        }
        let result = serde_json::from_str::<Option<Vec<T>>>(&content).map_err(|e| {
            tracing::warn!("Cannot decode list from {}: {}", name, e);
            e
        })?;
        Ok(result.unwrap_or_default())
    }

    async fn send<T>(&self, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let (_, content) = self.execute(request).await?;
        let result = serde_json::from_str::<T>(&content)?;
        Ok(result)
    }

    /// Send the request and return the endpoint name and the raw body.
    /// Rejected requests become `Error::Api` with the backend's message, if any.
    async fn execute(&self, request: RequestBuilder) -> Result<(String, String)> {
        let response = request.send().await?;
        let status = response.status();
        let name = endpoint_name(response.url());
        let content = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&content)
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.trim().is_empty());
            tracing::debug!("{} rejected with {}: {:?}", name, status, message);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        if let Err(e) = self.log(&name, &content).await {
            tracing::warn!("Cannot dump response of {}: {}", name, e);
        }
        Ok((name, content))
    }

    async fn log(&self, name: &str, content: &str) -> Result<()> {
        use tokio::{fs::File, io::AsyncWriteExt};

        if let Some(dir) = &self.log_dir {
            let time = chrono::Local::now().format("%Y%m%d_%H%M%S");
            let filepath = dir.join(format!("blog_{}_{}.json", name, time));
            let mut file = File::create(filepath).await?;
            file.write_all(content.as_bytes()).await?;
        }
        Ok(())
    }
}

fn endpoint_name(url: &Url) -> String {
    url.path().trim_matches('/').replace('/', "_")
}
