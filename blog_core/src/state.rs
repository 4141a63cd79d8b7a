use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch, RwLock};
use tokio::task::JoinHandle;

use blog_client::{Article, ArticleId, Comment, Tag};

use crate::api::BlogApi;
use crate::cache::{CacheState, ChildCache, ChildKind};
use crate::confirm::Confirm;
use crate::error::{Error, Result};
use crate::expansion::ExpansionStore;
use crate::form::available_tags;
use crate::list::{sort_comments, ArticleList, ArticleSummary};
use crate::notice::{Notice, NoticeBoard, NoticeId, NoticeScope};

pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(6);
pub const DEFAULT_EXCERPT_WORDS: usize = 50;
const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct Settings {
    /// How long a toast stays up.
    pub notice_ttl: Duration,
    /// Length of the content excerpt in list summaries.
    pub excerpt_words: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notice_ttl: DEFAULT_NOTICE_TTL,
            excerpt_words: DEFAULT_EXCERPT_WORDS,
        }
    }
}

/// Changes other views may need to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogEvent {
    /// The article is gone; a view showing it should navigate away.
    ArticleDeleted(ArticleId),
    /// The article was created or edited.
    ArticleSaved(ArticleId),
}

/// Everything mirrored from the backend, plus UI-only flags.
#[derive(Debug, Default)]
pub struct ViewState {
    pub articles: ArticleList,
    /// Every tag in the system.
    pub catalog: CacheState<Tag>,
    pub comments: ChildCache<Comment>,
    pub tags: ChildCache<Tag>,
    pub expansion: ExpansionStore,
    pub notices: NoticeBoard,
    /// Generation of the latest list request.
    list_ticket: u64,
}

/// Single owner of the view state. Clones share the same state.
#[derive(Clone)]
pub struct BlogState {
    pub(crate) api: Arc<dyn BlogApi>,
    pub(crate) confirm: Arc<dyn Confirm>,
    pub(crate) settings: Settings,
    pub(crate) view: Arc<RwLock<ViewState>>,
    pub(crate) events: broadcast::Sender<BlogEvent>,
    refresh: Arc<watch::Sender<bool>>,
}

impl BlogState {
    pub fn new(api: Arc<dyn BlogApi>, confirm: Arc<dyn Confirm>, settings: Settings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (refresh, _) = watch::channel(false);
        Self {
            api,
            confirm,
            settings,
            view: Arc::new(RwLock::new(ViewState::default())),
            events,
            refresh: Arc::new(refresh),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BlogEvent> {
        self.events.subscribe()
    }

    pub(crate) fn notice_ttl(&self) -> Option<chrono::Duration> {
        chrono::Duration::from_std(self.settings.notice_ttl).ok()
    }

    // MARK: Entity list

    /// Fetch the article list, filtered by tag name when given, and replace the displayed list.
    /// On failure the previous list and its filter stay and a banner is raised.
    pub async fn load_articles(&self, filter: Option<&str>) -> Result<()> {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty()).map(str::to_string);
        let ticket = {
            let mut view = self.view.write().await;
            view.list_ticket += 1;
            view.list_ticket
        };

        let result = match &filter {
            Some(tag_name) => self.api.articles_by_tag(tag_name).await,
            None => self.api.all_articles().await,
        };

        let mut view = self.view.write().await;
        if view.list_ticket != ticket {
            tracing::debug!("Dropping superseded article list response");
            return Ok(());
        }
        match result {
            Ok(articles) => {
                tracing::info!("Loaded {} articles (filter: {:?})", articles.len(), filter);
                view.articles.set_filter(filter);
                view.articles.replace(articles);
                view.notices.clear_scope(NoticeScope::Banner);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Cannot load articles (filter: {:?}): {}", filter, e);
                let message = match &filter {
                    Some(tag_name) => format!("Cannot load articles tagged \"{}\": {}", tag_name, e.user_message()),
                    None => format!("Cannot load articles: {}", e.user_message()),
                };
                view.notices.push(NoticeScope::Banner, message, None);
                Err(e.into())
            }
        }
    }

    /// Change the tag filter and reload the list from the backend.
    pub async fn set_filter(&self, filter: Option<String>) -> Result<()> {
        self.load_articles(filter.as_deref()).await
    }

    /// Full refresh: drop every cached child collection and open panel, then reload the list.
    pub async fn reload(&self) -> Result<()> {
        let filter = {
            let mut view = self.view.write().await;
            view.comments.clear();
            view.tags.clear();
            view.expansion.clear();
            view.articles.filter().map(str::to_string)
        };
        self.load_articles(filter.as_deref()).await
    }

    /// Toggle the refresh flag. Listeners reload the list.
    pub fn request_refresh(&self) {
        self.refresh.send_modify(|flag| *flag = !*flag);
    }

    pub fn watch_refresh(&self) -> watch::Receiver<bool> {
        self.refresh.subscribe()
    }

    /// Reload the list every time the refresh flag toggles.
    pub fn spawn_refresh_listener(&self) -> JoinHandle<()> {
        let state = self.clone();
        let mut receiver = self.refresh.subscribe();
        tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                if let Err(e) = state.reload().await {
                    tracing::warn!("Refresh failed: {}", e);
                }
            }
        })
    }

    /// Fetch the tag catalog. A failure leaves it empty.
    pub async fn load_catalog(&self) {
        self.view.write().await.catalog = CacheState::Loading;
        let result = self.api.all_tags().await;
        let mut view = self.view.write().await;
        view.catalog = match result {
            Ok(tags) => CacheState::Loaded(tags),
            Err(e) => {
                tracing::warn!("Cannot load tag catalog: {}", e);
                CacheState::Loaded(vec![])
            }
        };
    }

    // MARK: Child collections

    /// Load a child collection unless it is already loading or loaded.
    pub async fn ensure_loaded(&self, id: ArticleId, kind: ChildKind) {
        self.load_child(id, kind, false).await
    }

    /// `ensure_loaded` without waiting for it.
    pub fn spawn_ensure_loaded(&self, id: ArticleId, kind: ChildKind) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move { state.ensure_loaded(id, kind).await })
    }

    /// Flip a panel. Opening it loads the collection if needed; closing keeps the cache.
    pub async fn toggle(&self, id: ArticleId, kind: ChildKind) -> bool {
        let opened = self.view.write().await.expansion.toggle(id, kind);
        if opened {
            self.ensure_loaded(id, kind).await;
        }
        opened
    }

    /// Refetch a collection regardless of its state and open its panel.
    pub(crate) async fn invalidate(&self, id: ArticleId, kind: ChildKind) {
        self.view.write().await.expansion.open(id, kind);
        self.load_child(id, kind, true).await
    }

    async fn load_child(&self, id: ArticleId, kind: ChildKind, force: bool) {
        let api = self.api.clone();
        match kind {
            ChildKind::Comments => {
                self.load_into(id, kind, force, |view| &mut view.comments, || async move {
                    api.comments_by_article(id).await.map(sort_comments)
                })
                .await
            }
            ChildKind::Tags => {
                self.load_into(id, kind, force, |view| &mut view.tags, || async move {
                    api.article_tags(id).await
                })
                .await
            }
        }
    }

    async fn load_into<T, F, Fut>(
        &self,
        id: ArticleId,
        kind: ChildKind,
        force: bool,
        select: fn(&mut ViewState) -> &mut ChildCache<T>,
        fetch: F,
    ) where
        T: Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = blog_client::Result<Vec<T>>>,
    {
        let ticket = {
            let mut view = self.view.write().await;
            match select(&mut view).begin(id, force) {
                Some(ticket) => ticket,
                None => {
                    tracing::trace!("{} of article {} already present", kind, id);
                    return;
                }
            }
        };

        tracing::debug!("Fetching {} of article {}", kind, id);
        let result = fetch().await;

        let mut view = self.view.write().await;
        let panel = NoticeScope::Panel { article: id, kind };
        match result {
            Ok(items) => {
                if select(&mut view).complete(id, ticket, items) {
                    view.notices.clear_scope(panel);
                } else {
                    tracing::debug!("Dropping superseded {} of article {}", kind, id);
                }
            }
            Err(e) => {
                tracing::warn!("Cannot load {} of article {}: {}", kind, id, e);
                if select(&mut view).fail(id, ticket) {
                    let message = format!("Cannot load {}: {}", kind, e.user_message());
                    view.notices.push(panel, message, None);
                }
            }
        }
    }

    // MARK: Snapshots

    pub async fn articles(&self) -> Vec<Article> {
        self.view.read().await.articles.articles().to_vec()
    }

    pub async fn article(&self, id: ArticleId) -> Option<Article> {
        self.view.read().await.articles.get(id).cloned()
    }

    pub async fn summaries(&self) -> Vec<ArticleSummary> {
        let view = self.view.read().await;
        view.articles
            .articles()
            .iter()
            .map(|a| ArticleSummary::new(a, self.settings.excerpt_words))
            .collect()
    }

    pub async fn filter(&self) -> Option<String> {
        self.view.read().await.articles.filter().map(str::to_string)
    }

    pub async fn catalog(&self) -> CacheState<Tag> {
        self.view.read().await.catalog.clone()
    }

    pub async fn comments(&self, id: ArticleId) -> CacheState<Comment> {
        self.view.read().await.comments.state(id)
    }

    pub async fn tags(&self, id: ArticleId) -> CacheState<Tag> {
        self.view.read().await.tags.state(id)
    }

    pub async fn is_expanded(&self, id: ArticleId, kind: ChildKind) -> bool {
        self.view.read().await.expansion.is_open(id, kind)
    }

    /// Whether the last fetch of a panel failed; its collection is then shown empty.
    pub async fn panel_failed(&self, id: ArticleId, kind: ChildKind) -> bool {
        let view = self.view.read().await;
        match kind {
            ChildKind::Comments => view.comments.failed(id),
            ChildKind::Tags => view.tags.failed(id),
        }
    }

    /// Tags that may still be attached to an article.
    pub async fn available_tags(&self, id: ArticleId) -> Vec<Tag> {
        let view = self.view.read().await;
        let catalog = view.catalog.items().unwrap_or_default();
        available_tags(catalog, &attached_tags(&view, id))
    }

    pub async fn notices(&self) -> Vec<Notice> {
        self.view.write().await.notices.active(chrono::Utc::now())
    }

    pub async fn dismiss_notice(&self, id: NoticeId) -> bool {
        self.view.write().await.notices.dismiss(id)
    }

    pub(crate) async fn raise(&self, scope: NoticeScope, error: &Error) {
        let ttl = match scope {
            NoticeScope::Toast => self.notice_ttl(),
            _ => None,
        };
        self.view.write().await.notices.push(scope, error.user_message(), ttl);
    }
}

/// Tags known to be on an article: the loaded tag panel if any, else the list entry.
pub(crate) fn attached_tags(view: &ViewState, id: ArticleId) -> Vec<Tag> {
    if let Some(tags) = view.tags.items(id) {
        return tags.to_vec();
    }
    view.articles.get(id).map(|a| a.tags.clone()).unwrap_or_default()
}
