use std::collections::HashSet;

use blog_client::ArticleId;

use crate::cache::ChildKind;

/// Which child panels are open. Everything starts closed.
#[derive(Debug, Clone, Default)]
pub struct ExpansionStore {
    open: HashSet<(ArticleId, ChildKind)>,
}

impl ExpansionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, id: ArticleId, kind: ChildKind) -> bool {
        self.open.contains(&(id, kind))
    }

    /// Flip the flag and return its new value.
    pub fn toggle(&mut self, id: ArticleId, kind: ChildKind) -> bool {
        if self.open.remove(&(id, kind)) {
            false
        } else {
            self.open.insert((id, kind));
            true
        }
    }

    pub fn open(&mut self, id: ArticleId, kind: ChildKind) {
        self.open.insert((id, kind));
    }

    pub fn close(&mut self, id: ArticleId, kind: ChildKind) {
        self.open.remove(&(id, kind));
    }

    /// Forget every panel of an article.
    pub fn remove(&mut self, id: ArticleId) {
        self.open.retain(|(article, _)| *article != id);
    }

    pub fn clear(&mut self) {
        self.open.clear();
    }
}
