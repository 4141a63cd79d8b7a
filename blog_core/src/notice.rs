use chrono::{DateTime, Duration, Utc};

use blog_client::ArticleId;

use crate::cache::ChildKind;

pub type NoticeId = u64;

/// Where a notice is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeScope {
    /// Page-level banner for a failed list or detail load. At most one at a time.
    Banner,
    /// Inline notice inside one article's child panel.
    Panel { article: ArticleId, kind: ChildKind },
    /// Transient notice for a failed mutation.
    Toast,
    /// Input rejected before sending.
    Form,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: NoticeId,
    pub scope: NoticeScope,
    pub message: String,
    pub raised_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Notice {
    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    next_id: NoticeId,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a notice. Banners and panel notices replace an earlier one of the same scope.
    pub fn push(&mut self, scope: NoticeScope, message: impl Into<String>, ttl: Option<Duration>) -> NoticeId {
        if matches!(scope, NoticeScope::Banner | NoticeScope::Panel { .. }) {
            self.clear_scope(scope);
        }
        self.next_id += 1;
        let raised_at = Utc::now();
        self.notices.push(Notice {
            id: self.next_id,
            scope,
            message: message.into(),
            raised_at,
            expires_at: ttl.map(|ttl| raised_at + ttl),
        });
        self.next_id
    }

    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    pub fn clear_scope(&mut self, scope: NoticeScope) {
        self.notices.retain(|n| n.scope != scope);
    }

    /// Drop every notice tied to an article.
    pub fn clear_article(&mut self, id: ArticleId) {
        self.notices
            .retain(|n| !matches!(n.scope, NoticeScope::Panel { article, .. } if article == id));
    }

    /// Drop expired notices and return the rest, oldest first.
    pub fn active(&mut self, now: DateTime<Utc>) -> Vec<Notice> {
        self.notices.retain(|n| !n.expired(now));
        self.notices.clone()
    }
}
