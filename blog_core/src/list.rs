use std::cmp::Reverse;
use std::collections::HashMap;

use itertools::Itertools;

use blog_client::{Article, ArticleId, Comment, Tag};
use blog_util::truncate_words;

/// Counter touched by a like or dislike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    fn counter(self, article: &mut Article) -> &mut u32 {
        match self {
            Reaction::Like => &mut article.likes,
            Reaction::Dislike => &mut article.dislikes,
        }
    }

    pub fn value(self, article: &Article) -> u32 {
        match self {
            Reaction::Like => article.likes,
            Reaction::Dislike => article.dislikes,
        }
    }
}

/// Marks the last time an article's counters were taken from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStamp(u64);

/// The displayed articles, newest first.
#[derive(Debug, Clone, Default)]
pub struct ArticleList {
    articles: Vec<Article>,
    /// Tag name the list is filtered by, if any.
    filter: Option<String>,
    loaded: bool,
    synced: HashMap<ArticleId, u64>,
    next_sync: u64,
}

impl ArticleList {
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter;
    }

    /// Whether any load has succeeded yet.
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    pub fn get(&self, id: ArticleId) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    fn get_mut(&mut self, id: ArticleId) -> Option<&mut Article> {
        self.articles.iter_mut().find(|a| a.id == id)
    }

    /// Replace the whole list with a fresh fetch.
    pub fn replace(&mut self, articles: Vec<Article>) {
        self.articles = sort_articles(articles);
        self.loaded = true;
        self.next_sync += 1;
        let sync = self.next_sync;
        self.synced = self.articles.iter().map(|a| (a.id, sync)).collect();
    }

    pub fn remove(&mut self, id: ArticleId) -> Option<Article> {
        let index = self.articles.iter().position(|a| a.id == id)?;
        self.synced.remove(&id);
        Some(self.articles.remove(index))
    }

    fn stamp(&self, id: ArticleId) -> SyncStamp {
        SyncStamp(self.synced.get(&id).copied().unwrap_or_default())
    }

    /// Bump a counter locally. Returns `None` if the article is not displayed.
    pub fn bump(&mut self, id: ArticleId, reaction: Reaction) -> Option<SyncStamp> {
        let stamp = self.stamp(id);
        let article = self.get_mut(id)?;
        let counter = reaction.counter(article);
        *counter = counter.saturating_add(1);
        Some(stamp)
    }

    /// Undo a local bump, unless server counters arrived after it.
    /// Returns whether the counter was changed.
    pub fn unbump(&mut self, id: ArticleId, reaction: Reaction, since: SyncStamp) -> bool {
        if self.stamp(id) != since {
            return false;
        }
        match self.get_mut(id) {
            Some(article) => {
                let counter = reaction.counter(article);
                *counter = counter.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    /// Take the server's value for a counter.
    pub fn set_counter(&mut self, id: ArticleId, reaction: Reaction, value: u32) {
        if let Some(article) = self.get_mut(id) {
            *reaction.counter(article) = value;
            self.next_sync += 1;
            self.synced.insert(id, self.next_sync);
        }
    }

    pub fn set_tags(&mut self, id: ArticleId, tags: Vec<Tag>) {
        if let Some(article) = self.get_mut(id) {
            article.tags = tags;
        }
    }
}

/// Newest first by identifier.
pub fn sort_articles(articles: Vec<Article>) -> Vec<Article> {
    articles.into_iter().sorted_by_key(|a| Reverse(a.id)).collect()
}

/// Newest first by creation time; comments without a timestamp go last.
pub fn sort_comments(comments: Vec<Comment>) -> Vec<Comment> {
    comments
        .into_iter()
        .sorted_by_key(|c| Reverse(c.created_at))
        .collect()
}

/// What a list card shows for one article.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleSummary {
    pub id: ArticleId,
    pub title: String,
    pub excerpt: String,
    pub likes: u32,
    pub dislikes: u32,
    pub tags: Vec<String>,
}

impl ArticleSummary {
    pub fn new(article: &Article, excerpt_words: usize) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            excerpt: truncate_words(&article.content, excerpt_words),
            likes: article.likes,
            dislikes: article.dislikes,
            tags: article.tags.iter().map(|t| t.name.clone()).collect(),
        }
    }
}
