use std::time::Duration;

use crate::cache::{CacheState, ChildKind};
use crate::error::Error;
use crate::notice::NoticeScope;
use crate::state::Settings;

use super::mock::{comment, state, state_with, tag, Answer, MockApi};

#[tokio::test]
async fn test_load_sorts_newest_first() {
    let api = MockApi::with_articles(&[1, 3]);
    let state = state(&api);

    state.load_articles(None).await.unwrap();
    let ids: Vec<_> = state.articles().await.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![3, 1]);
    assert_eq!(api.calls(), vec!["all_articles:".to_string()]);
}

#[tokio::test]
async fn test_load_failure_keeps_previous_list() {
    let api = MockApi::with_articles(&[1, 2]);
    let state = state(&api);
    state.load_articles(None).await.unwrap();

    api.fail("all_articles");
    let err = state.load_articles(None).await.unwrap_err();
    assert!(matches!(err, Error::Client(_)));
    assert_eq!(state.articles().await.len(), 2);

    let notices = state.notices().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].scope, NoticeScope::Banner);
    assert!(notices[0].message.contains("all_articles failed"));

    api.recover("all_articles");
    state.load_articles(None).await.unwrap();
    assert!(state.notices().await.is_empty());
}

#[tokio::test]
async fn test_filter_reissues_full_load() {
    let api = MockApi::with_articles(&[1, 2, 3]);
    api.edit(|data| data.articles[1].tags = vec![tag(9, "go")]);
    let state = state(&api);

    state.set_filter(Some("go".to_string())).await.unwrap();
    let ids: Vec<_> = state.articles().await.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(state.filter().await.as_deref(), Some("go"));

    api.fail("articles_by_tag");
    let err = state.set_filter(Some("rust".to_string())).await.unwrap_err();
    assert!(err.user_message().contains("articles_by_tag failed"));
    assert!(state.notices().await[0].message.contains("\"rust\""));
    assert_eq!(state.filter().await.as_deref(), Some("go"));
    assert_eq!(state.articles().await[0].id, 2);

    state.set_filter(None).await.unwrap();
    assert_eq!(state.articles().await.len(), 3);
    assert_eq!(api.count("articles_by_tag"), 2);
    assert_eq!(api.count("all_articles"), 1);
}

#[tokio::test]
async fn test_superseded_list_load_is_dropped() {
    let api = MockApi::with_articles(&[1, 2]);
    api.edit(|data| data.articles[0].tags = vec![tag(9, "go")]);
    let state = state(&api);

    let (first, second) = tokio::join!(state.load_articles(None), state.load_articles(Some("go")));
    first.unwrap();
    second.unwrap();
    let ids: Vec<_> = state.articles().await.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn test_concurrent_ensure_loaded_issues_one_request() {
    let api = MockApi::with_articles(&[5]);
    let state = state(&api);

    tokio::join!(
        state.ensure_loaded(5, ChildKind::Comments),
        state.ensure_loaded(5, ChildKind::Comments),
    );
    assert_eq!(api.count("comments_by_article"), 1);

    state.ensure_loaded(5, ChildKind::Comments).await;
    assert_eq!(api.count("comments_by_article"), 1);
}

#[tokio::test]
async fn test_loading_is_not_empty() {
    let api = MockApi::with_articles(&[5]);
    let state = state(&api);

    let (_, during) = tokio::join!(state.ensure_loaded(5, ChildKind::Comments), async {
        state.comments(5).await
    });
    assert_eq!(during, CacheState::Loading);

    // No comments at all: an empty terminal state, not a spinner.
    assert_eq!(state.comments(5).await, CacheState::Loaded(vec![]));
    assert!(!state.panel_failed(5, ChildKind::Comments).await);
}

#[tokio::test]
async fn test_toggle_reopen_uses_cache() {
    let api = MockApi::with_articles(&[2]);
    api.edit(|data| {
        data.comments.insert(2, vec![comment(1, 2, Some(1)), comment(2, 2, Some(2))]);
    });
    let state = state(&api);

    assert!(state.toggle(2, ChildKind::Comments).await);
    assert!(state.is_expanded(2, ChildKind::Comments).await);
    let ids: Vec<_> = state.comments(2).await.items().unwrap().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 1]);

    assert!(!state.toggle(2, ChildKind::Comments).await);
    assert!(state.comments(2).await.is_loaded());
    assert!(state.toggle(2, ChildKind::Comments).await);
    assert_eq!(api.count("comments_by_article"), 1);

    assert!(!state.is_expanded(2, ChildKind::Tags).await);
    assert!(state.tags(2).await.is_unloaded());
}

#[tokio::test]
async fn test_failed_child_load_is_empty_and_flagged() {
    let api = MockApi::with_articles(&[4]);
    api.fail("article_tags");
    let state = state(&api);

    state.toggle(4, ChildKind::Tags).await;
    assert_eq!(state.tags(4).await, CacheState::Loaded(vec![]));
    assert!(state.panel_failed(4, ChildKind::Tags).await);

    let notices = state.notices().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(
        notices[0].scope,
        NoticeScope::Panel {
            article: 4,
            kind: ChildKind::Tags
        }
    );

    // Retry by invalidating: the notice goes away once the panel loads.
    api.recover("article_tags");
    state.invalidate(4, ChildKind::Tags).await;
    assert!(!state.panel_failed(4, ChildKind::Tags).await);
    assert!(state.notices().await.is_empty());
}

#[tokio::test]
async fn test_requests_for_different_articles_are_independent() {
    let api = MockApi::with_articles(&[1, 2]);
    api.edit(|data| {
        data.comments.insert(1, vec![comment(10, 1, None)]);
        data.comments.insert(2, vec![comment(20, 2, None)]);
    });
    let state = state(&api);

    tokio::join!(
        state.ensure_loaded(2, ChildKind::Comments),
        state.ensure_loaded(1, ChildKind::Comments),
    );
    assert_eq!(state.comments(1).await.items().unwrap()[0].id, 10);
    assert_eq!(state.comments(2).await.items().unwrap()[0].id, 20);
}

#[tokio::test]
async fn test_reload_clears_caches() {
    let api = MockApi::with_articles(&[1]);
    let state = state(&api);
    state.load_articles(None).await.unwrap();
    state.toggle(1, ChildKind::Comments).await;

    state.reload().await.unwrap();
    assert!(state.comments(1).await.is_unloaded());
    assert!(!state.is_expanded(1, ChildKind::Comments).await);
    assert_eq!(api.count("all_articles"), 2);
}

#[tokio::test]
async fn test_reload_discards_in_flight_child_response() {
    let api = MockApi::with_articles(&[1]);
    let state = state(&api);

    let (_, reloaded) = tokio::join!(state.ensure_loaded(1, ChildKind::Comments), state.reload());
    reloaded.unwrap();
    assert!(state.comments(1).await.is_unloaded());
}

#[tokio::test]
async fn test_spawned_ensure_loaded() {
    let api = MockApi::with_articles(&[3]);
    let state = state(&api);

    state.spawn_ensure_loaded(3, ChildKind::Tags).await.unwrap();
    assert!(state.tags(3).await.is_loaded());
}

#[tokio::test]
async fn test_catalog_and_available_tags() {
    let api = MockApi::with_articles(&[2]);
    api.edit(|data| {
        data.catalog = vec![tag(1, "rust"), tag(9, "go")];
        data.articles[0].tags = vec![tag(9, "go")];
    });
    let state = state(&api);
    state.load_articles(None).await.unwrap();
    state.load_catalog().await;

    assert_eq!(state.catalog().await.items().unwrap().len(), 2);
    assert_eq!(state.available_tags(2).await, vec![tag(1, "rust")]);

    api.fail("all_tags");
    state.load_catalog().await;
    assert_eq!(state.catalog().await, CacheState::Loaded(vec![]));
    assert!(state.available_tags(2).await.is_empty());
}

#[tokio::test]
async fn test_load_detail_seeds_caches() {
    let api = MockApi::with_articles(&[6]);
    api.edit(|data| {
        data.comments.insert(6, vec![comment(1, 6, None), comment(2, 6, Some(10))]);
        data.articles[0].tags = vec![tag(1, "rust")];
    });
    let state = state(&api);

    let detail = state.load_detail(6).await.unwrap();
    assert_eq!(detail.article.id, 6);
    assert_eq!(detail.comments.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 1]);
    assert_eq!(detail.tags, vec![tag(1, "rust")]);

    state.ensure_loaded(6, ChildKind::Comments).await;
    state.ensure_loaded(6, ChildKind::Tags).await;
    assert_eq!(api.count("comments_by_article"), 1);
    assert_eq!(api.count("article_tags"), 1);

    let err = state.load_detail(99).await.unwrap_err();
    assert_eq!(err.user_message(), "Article not found");
    assert_eq!(state.notices().await[0].scope, NoticeScope::Banner);
}

#[tokio::test]
async fn test_refresh_listener_reloads() {
    let api = MockApi::with_articles(&[1]);
    let state = state(&api);
    let listener = state.spawn_refresh_listener();

    state.request_refresh();
    for _ in 0..100 {
        if api.count("all_articles") > 0 && !state.articles().await.is_empty() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(state.articles().await.len(), 1);
    listener.abort();
}

#[tokio::test]
async fn test_summaries_use_settings() {
    let api = MockApi::with_articles(&[1]);
    let settings = Settings {
        notice_ttl: Duration::from_secs(1),
        excerpt_words: 2,
    };
    let state = state_with(&api, &Answer::new(true), settings);
    state.load_articles(None).await.unwrap();

    let summaries = state.summaries().await;
    assert_eq!(summaries[0].excerpt, "Content of...");
    assert_eq!(state.settings().excerpt_words, 2);
}
