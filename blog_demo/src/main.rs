use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use blog_client::{ArticlePayload, BlogClient, ClientConfig};
use blog_core::{BlogState, Confirm, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // 1. Initialize logger
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env()?
        .add_directive("hyper::proto=info".parse()?)
        .add_directive("hyper::client=info".parse()?)
        .add_directive("reqwest=info".parse()?);
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    // 2. Initialize client
    let config = ClientConfig::from_env().context("Cannot read client config")?;
    let client = Arc::new(BlogClient::new(&config)?);
    tracing::info!("Using backend at {}", client.base_url());

    // 3. Create an article and read it back
    let payload = ArticlePayload::new("Test article", "This is a test article content.");
    let created = client.create_article(&payload).await?;
    tracing::info!("Article created: {}", serde_json::to_string(&created)?);

    let fetched = client.article(created.id).await?;
    tracing::info!("Article retrieved: {}", serde_json::to_string_pretty(&fetched)?);

    // 4. Load the list through the state container
    let decline_all: Arc<dyn Confirm> = Arc::new(|_: &str| false);
    let state = BlogState::new(client, decline_all, Settings::default());
    state.load_articles(None).await?;
    for summary in state.summaries().await {
        tracing::info!(
            "#{} {} (+{} -{}) [{}]: {}",
            summary.id,
            summary.title,
            summary.likes,
            summary.dislikes,
            summary.tags.join(", "),
            summary.excerpt
        );
    }

    let detail = state.load_detail(created.id).await?;
    tracing::info!(
        "Article {} has {} comments and {} tags",
        detail.article.id,
        detail.comments.len(),
        detail.tags.len()
    );
    Ok(())
}
