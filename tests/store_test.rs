use chrono::Duration;
use portfolio_chat::store::{ConversationStore, MemoryStore, StoreError};
use portfolio_chat::types::Role;
use std::sync::Arc;
use tokio::sync::RwLock;

const WELCOME: &str = "Hi! Ask me anything.";

#[test]
fn start_without_id_seeds_one_welcome_message() {
    let mut store = MemoryStore::new();
    let id = store.start(None, WELCOME);
    assert!(!id.is_empty());

    let history = store.history(&id);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].role, Role::Assistant);
    assert_eq!(history[0].content, WELCOME);
}

#[test]
fn start_generates_unique_ids() {
    let mut store = MemoryStore::new();
    let first = store.start(None, WELCOME);
    let second = store.start(None, WELCOME);
    assert_ne!(first, second);
    assert_eq!(store.count(), 2);
}

#[test]
fn start_with_known_id_keeps_existing_history() {
    let mut store = MemoryStore::new();
    let id = store.start(None, WELCOME);
    store.append(&id, Role::User, "hello").expect("append");

    let resolved = store.start(Some(&id), WELCOME);
    assert_eq!(resolved, id);

    // Welcome + user turn: no reset, no duplicate seeding.
    assert_eq!(store.history(&id).len(), 2);
}

#[test]
fn start_with_unknown_id_creates_a_fresh_session() {
    let mut store = MemoryStore::new();
    let resolved = store.start(Some("no-such-session"), WELCOME);
    assert_ne!(resolved, "no-such-session");
    assert_eq!(store.history(&resolved).len(), 1);
    assert!(store.history("no-such-session").is_empty());
}

#[test]
fn append_preserves_order_with_non_decreasing_timestamps() {
    let mut store = MemoryStore::new();
    let id = store.start(None, WELCOME);
    store.append(&id, Role::User, "first").expect("append");
    store.append(&id, Role::Assistant, "second").expect("append");
    store.append(&id, Role::User, "third").expect("append");

    let history = store.history(&id);
    let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec![WELCOME, "first", "second", "third"]);
    for pair in history.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

#[test]
fn append_to_unknown_session_fails_loudly() {
    let mut store = MemoryStore::new();
    let err = store
        .append("missing", Role::User, "hello")
        .expect_err("append without start must fail");
    assert!(matches!(err, StoreError::NotFound(_)));

    // No phantom conversation was created.
    assert_eq!(store.count(), 0);
}

#[test]
fn history_of_unknown_session_is_empty() {
    let store = MemoryStore::new();
    assert!(store.history("missing").is_empty());
}

#[test]
fn topics_accumulate_without_duplicates() {
    let mut store = MemoryStore::new();
    let id = store.start(None, WELCOME);
    assert!(store.topics(&id).is_empty());

    store.add_topics(&id, &["skills".into(), "projects".into()]);
    store.add_topics(&id, &["projects".into(), "education".into()]);
    assert_eq!(store.topics(&id), vec!["skills", "projects", "education"]);

    // Unknown session is a no-op.
    store.add_topics("missing", &["skills".into()]);
    assert!(store.topics("missing").is_empty());
}

#[test]
fn evict_stale_removes_exactly_the_idle_sessions() {
    let mut store = MemoryStore::new();
    let stale = store.start(None, WELCOME);

    // Separate the two sessions' last_updated times.
    std::thread::sleep(std::time::Duration::from_millis(10));
    let fresh = store.start(None, WELCOME);
    let mid = store.get(&fresh).expect("fresh session").last_updated;

    let timeout = Duration::minutes(30);
    let removed = store.evict_stale(mid + timeout, timeout);

    assert_eq!(removed, 1);
    assert!(store.history(&stale).is_empty());

    // Survivor keeps its message sequence untouched.
    let history = store.history(&fresh);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].content, WELCOME);
}

#[test]
fn contains_tracks_the_session_lifecycle() {
    let mut store = MemoryStore::new();
    assert!(!store.contains("missing"));

    let id = store.start(None, WELCOME);
    assert!(store.contains(&id));

    let timeout = Duration::minutes(30);
    store.evict_stale(chrono::Utc::now() + timeout, timeout);
    assert!(!store.contains(&id));
}

#[test]
fn evict_stale_with_nothing_stale_removes_nothing() {
    let mut store = MemoryStore::new();
    store.start(None, WELCOME);
    let removed = store.evict_stale(chrono::Utc::now(), Duration::minutes(30));
    assert_eq!(removed, 0);
    assert_eq!(store.count(), 1);
}

#[tokio::test]
async fn concurrent_appends_on_one_session_both_land() {
    let mut store = MemoryStore::new();
    let id = store.start(None, WELCOME);
    let store = Arc::new(RwLock::new(store));

    let a = {
        let store = Arc::clone(&store);
        let id = id.clone();
        tokio::spawn(async move { store.write().await.append(&id, Role::User, "from a") })
    };
    let b = {
        let store = Arc::clone(&store);
        let id = id.clone();
        tokio::spawn(async move { store.write().await.append(&id, Role::User, "from b") })
    };

    a.await.expect("join a").expect("append a");
    b.await.expect("join b").expect("append b");

    let history = store.read().await.history(&id);
    let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(history.len(), 3);
    assert!(contents.contains(&"from a"));
    assert!(contents.contains(&"from b"));
}
