use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use blog_client::ArticleId;

/// Presence of a lazily fetched collection.
/// `Loading` is distinct from `Loaded(vec![])`: an empty result is terminal, a pending one is not.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CacheState<T> {
    #[default]
    Unloaded,
    Loading,
    Loaded(Vec<T>),
}

impl<T> CacheState<T> {
    pub fn is_unloaded(&self) -> bool {
        matches!(self, CacheState::Unloaded)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, CacheState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, CacheState::Loaded(_))
    }

    pub fn items(&self) -> Option<&[T]> {
        match self {
            CacheState::Loaded(items) => Some(items),
            _ => None,
        }
    }
}

/// The child collections hanging off an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    Comments,
    Tags,
}

impl Display for ChildKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ChildKind::Comments => write!(f, "comments"),
            ChildKind::Tags => write!(f, "tags"),
        }
    }
}

/// Identifies one issued fetch. Only the latest ticket of a slot may complete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
struct Slot<T> {
    state: CacheState<T>,
    ticket: Ticket,
    failed: bool,
}

/// Per-article cache of one kind of child collection.
#[derive(Debug, Clone)]
pub struct ChildCache<T> {
    slots: HashMap<ArticleId, Slot<T>>,
    next_ticket: u64,
}

impl<T> Default for ChildCache<T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            next_ticket: 0,
        }
    }
}

impl<T: Clone> ChildCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: ArticleId) -> CacheState<T> {
        self.slots.get(&id).map(|slot| slot.state.clone()).unwrap_or_default()
    }

    pub fn items(&self, id: ArticleId) -> Option<&[T]> {
        self.slots.get(&id).and_then(|slot| slot.state.items())
    }

    /// Whether the last fetch for `id` failed. The slot is then `Loaded(vec![])`.
    pub fn failed(&self, id: ArticleId) -> bool {
        self.slots.get(&id).is_some_and(|slot| slot.failed)
    }

    /// Mark `id` as loading and hand out a ticket for the fetch.
    /// Returns `None` when the slot is already loading or loaded, unless `force` is set.
    pub fn begin(&mut self, id: ArticleId, force: bool) -> Option<Ticket> {
        if !force {
            if let Some(slot) = self.slots.get(&id) {
                if !slot.state.is_unloaded() {
                    return None;
                }
            }
        }
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.slots.insert(
            id,
            Slot {
                state: CacheState::Loading,
                ticket,
                failed: false,
            },
        );
        Some(ticket)
    }

    /// Store a fetched collection. Returns false if the ticket was superseded.
    pub fn complete(&mut self, id: ArticleId, ticket: Ticket, items: Vec<T>) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) if slot.ticket == ticket => {
                slot.state = CacheState::Loaded(items);
                slot.failed = false;
                true
            }
            _ => false,
        }
    }

    /// Record a failed fetch as an empty collection. Returns false if the ticket was superseded.
    pub fn fail(&mut self, id: ArticleId, ticket: Ticket) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) if slot.ticket == ticket => {
                slot.state = CacheState::Loaded(vec![]);
                slot.failed = true;
                true
            }
            _ => false,
        }
    }

    /// Replace the collection outright, e.g. from a detail fetch.
    /// Any fetch still in flight for `id` is superseded.
    pub fn seed(&mut self, id: ArticleId, items: Vec<T>) {
        self.next_ticket += 1;
        self.slots.insert(
            id,
            Slot {
                state: CacheState::Loaded(items),
                ticket: Ticket(self.next_ticket),
                failed: false,
            },
        );
    }

    pub fn remove(&mut self, id: ArticleId) {
        self.slots.remove(&id);
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
