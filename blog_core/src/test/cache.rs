use chrono::{Duration, Utc};

use crate::cache::{CacheState, ChildCache, ChildKind};
use crate::expansion::ExpansionStore;
use crate::list::{sort_comments, ArticleList, ArticleSummary, Reaction};
use crate::notice::{NoticeBoard, NoticeScope};

use super::mock::{article, comment, tag};

#[test]
fn test_cache_begin_is_a_lock() {
    let mut cache: ChildCache<u32> = ChildCache::new();
    assert!(cache.state(1).is_unloaded());

    let ticket = cache.begin(1, false).unwrap();
    assert!(cache.state(1).is_loading());
    assert!(cache.begin(1, false).is_none());

    assert!(cache.complete(1, ticket, vec![]));
    assert_eq!(cache.state(1), CacheState::Loaded(vec![]));
    assert!(cache.begin(1, false).is_none());
    assert!(!cache.failed(1));
}

#[test]
fn test_cache_forced_begin_supersedes() {
    let mut cache: ChildCache<u32> = ChildCache::new();
    let first = cache.begin(1, false).unwrap();
    let second = cache.begin(1, true).unwrap();

    assert!(!cache.complete(1, first, vec![1]));
    assert!(cache.state(1).is_loading());
    assert!(cache.complete(1, second, vec![2]));
    assert_eq!(cache.items(1), Some(&[2][..]));
}

#[test]
fn test_cache_failure_is_terminal() {
    let mut cache: ChildCache<u32> = ChildCache::new();
    let ticket = cache.begin(4, false).unwrap();
    assert!(cache.fail(4, ticket));
    assert_eq!(cache.state(4), CacheState::Loaded(vec![]));
    assert!(cache.failed(4));

    let ticket = cache.begin(4, true).unwrap();
    assert!(cache.complete(4, ticket, vec![7]));
    assert!(!cache.failed(4));
}

#[test]
fn test_cache_clear_discards_in_flight() {
    let mut cache: ChildCache<u32> = ChildCache::new();
    let ticket = cache.begin(1, false).unwrap();
    cache.clear();
    assert!(!cache.complete(1, ticket, vec![1]));
    assert!(cache.state(1).is_unloaded());

    let ticket = cache.begin(1, false).unwrap();
    cache.seed(1, vec![9]);
    assert!(!cache.complete(1, ticket, vec![1]));
    assert_eq!(cache.items(1), Some(&[9][..]));
}

#[test]
fn test_expansion_toggle() {
    let mut store = ExpansionStore::new();
    assert!(!store.is_open(1, ChildKind::Comments));
    assert!(store.toggle(1, ChildKind::Comments));
    assert!(store.is_open(1, ChildKind::Comments));
    assert!(!store.is_open(1, ChildKind::Tags));
    assert!(!store.toggle(1, ChildKind::Comments));

    store.open(1, ChildKind::Tags);
    store.open(2, ChildKind::Tags);
    store.remove(1);
    assert!(!store.is_open(1, ChildKind::Tags));
    assert!(store.is_open(2, ChildKind::Tags));
}

#[test]
fn test_list_sorted_newest_first() {
    let mut list = ArticleList::default();
    assert!(!list.loaded());
    list.replace(vec![article(1), article(3), article(2)]);
    let ids: Vec<_> = list.articles().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert!(list.loaded());

    assert_eq!(list.remove(2).map(|a| a.id), Some(2));
    assert!(list.remove(2).is_none());
}

#[test]
fn test_list_counters() {
    let mut list = ArticleList::default();
    list.replace(vec![article(1)]);
    let like = list.bump(1, Reaction::Like).unwrap();
    assert!(list.bump(5, Reaction::Like).is_none());
    assert_eq!(list.get(1).unwrap().likes, 1);

    assert!(list.unbump(1, Reaction::Like, like));
    assert_eq!(list.get(1).unwrap().likes, 0);
    assert_eq!(list.get(1).unwrap().dislikes, 0);

    list.set_counter(1, Reaction::Dislike, 12);
    assert_eq!(Reaction::Dislike.value(list.get(1).unwrap()), 12);
}

#[test]
fn test_unbump_after_server_value_is_skipped() {
    let mut list = ArticleList::default();
    list.replace(vec![article(1)]);
    let first = list.bump(1, Reaction::Like).unwrap();
    list.bump(1, Reaction::Like).unwrap();
    list.set_counter(1, Reaction::Like, 1);

    assert!(!list.unbump(1, Reaction::Like, first));
    assert_eq!(list.get(1).unwrap().likes, 1);

    let stale = list.bump(1, Reaction::Dislike).unwrap();
    list.replace(vec![article(1)]);
    assert!(!list.unbump(1, Reaction::Dislike, stale));
    assert_eq!(list.get(1).unwrap().dislikes, 0);
}

#[test]
fn test_comments_sorted_newest_first() {
    let sorted = sort_comments(vec![
        comment(1, 1, Some(5)),
        comment(2, 1, None),
        comment(3, 1, Some(30)),
    ]);
    let ids: Vec<_> = sorted.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[test]
fn test_summary_excerpt() {
    let mut a = article(1);
    a.content = "one two three four".to_string();
    a.tags = vec![tag(1, "rust")];
    let summary = ArticleSummary::new(&a, 2);
    assert_eq!(summary.excerpt, "one two...");
    assert_eq!(summary.tags, vec!["rust".to_string()]);
}

#[test]
fn test_notice_board() {
    let mut board = NoticeBoard::new();
    board.push(NoticeScope::Banner, "first", None);
    board.push(NoticeScope::Banner, "second", None);
    let toast = board.push(NoticeScope::Toast, "toast", Some(Duration::seconds(5)));
    board.push(
        NoticeScope::Panel {
            article: 3,
            kind: ChildKind::Comments,
        },
        "panel",
        None,
    );

    let now = Utc::now();
    let active = board.active(now);
    assert_eq!(active.len(), 3);
    assert_eq!(active[0].message, "second");

    let later = board.active(now + Duration::seconds(10));
    assert!(later.iter().all(|n| n.id != toast));

    board.clear_article(3);
    assert_eq!(board.active(now).len(), 1);
    let banner = board.active(now)[0].id;
    assert!(board.dismiss(banner));
    assert!(!board.dismiss(banner));
    assert!(board.active(now).is_empty());
}
