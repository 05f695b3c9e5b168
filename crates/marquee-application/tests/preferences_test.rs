mod common;

use std::sync::Arc;

use common::{FakeCatalog, Harness};
use marquee_application::{ScopedStore, SessionManager};
use marquee_core::catalog::Item;
use marquee_core::session::{SessionState, StaticCredentialSource};
use marquee_core::store::KeyValueStore;
use marquee_infrastructure::FileKeyValueStore;
use tempfile::TempDir;

async fn file_session(temp_dir: &TempDir) -> SessionManager {
    let backing = FileKeyValueStore::new(temp_dir.path().join("store.json"));
    let store = Arc::new(ScopedStore::new(Arc::new(backing)));
    SessionManager::restore(store, Arc::new(StaticCredentialSource::demo())).await
}

#[tokio::test]
async fn preferences_survive_restart() {
    let temp_dir = TempDir::new().unwrap();
    {
        let session = file_session(&temp_dir).await;
        session.login("alice", "alice123").await.unwrap();
        session.add_favorite(Item::new(268, "Batman")).await;
        session.add_recent_search("batman").await;
        session.add_recent_search("joker").await;
    }

    let session = file_session(&temp_dir).await;
    assert_eq!(
        session.current_identity().await.map(|i| i.to_string()),
        Some("alice".to_string())
    );
    assert!(session.is_favorite(268).await);
    assert_eq!(session.recent_searches().await.queries(), ["joker", "batman"]);
}

#[tokio::test]
async fn recent_searches_keep_five_most_recent() {
    let harness = Harness::new(FakeCatalog::new()).await;
    harness.session().login("bob", "bob123").await.unwrap();

    for query in ["a", "b", "c", "d", "e", "f"] {
        harness.explorer.on_query_changed(query).await;
    }
    assert_eq!(
        harness.session().recent_searches().await.queries(),
        ["f", "e", "d", "c", "b"]
    );

    harness.explorer.on_query_changed("d").await;
    harness.explorer.on_query_changed("   ").await;
    assert_eq!(
        harness.session().recent_searches().await.queries(),
        ["d", "f", "e", "c", "b"]
    );
}

#[tokio::test]
async fn add_then_remove_restores_across_identity_switch() {
    let harness = Harness::new(FakeCatalog::new()).await;
    let session = harness.session();

    session.login("alice", "alice123").await.unwrap();
    session.add_favorite(Item::new(1, "Alien")).await;
    let before = session.favorites().await;

    session.add_favorite(Item::new(2, "Aliens")).await;
    session.login("bob", "bob123").await.unwrap();
    session.add_favorite(Item::new(2, "Aliens")).await;
    session.login("alice", "alice123").await.unwrap();
    session.remove_favorite(2).await;

    assert_eq!(session.favorites().await, before);
    session.login("bob", "bob123").await.unwrap();
    assert!(session.is_favorite(2).await);
}

#[tokio::test]
async fn anonymous_intents_leave_storage_untouched() {
    let harness = Harness::new(FakeCatalog::new()).await;
    assert_eq!(harness.session().state().await, SessionState::Anonymous);

    harness.explorer.on_query_changed("batman").await;
    harness
        .explorer
        .on_favorite_toggled(Item::new(1, "Batman"))
        .await;

    assert!(harness.session().favorites().await.is_empty());
    assert!(harness.backing.is_empty().await);
}

#[tokio::test]
async fn corrupt_favorites_record_reads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let backing = FileKeyValueStore::new(temp_dir.path().join("store.json"));
    backing
        .set("user_alice_favorites", "[{\"id\": \"not a number\"}]".to_string())
        .await
        .unwrap();

    let session = file_session(&temp_dir).await;
    session.login("alice", "alice123").await.unwrap();
    assert!(session.favorites().await.is_empty());

    assert!(session.add_favorite(Item::new(7, "Se7en")).await);
    assert_eq!(session.favorites().await.len(), 1);
}

#[tokio::test]
async fn corrupt_store_file_recovers() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("store.json"), "garbage").unwrap();

    let session = file_session(&temp_dir).await;
    assert_eq!(session.state().await, SessionState::Anonymous);

    session.login("bob", "bob123").await.unwrap();
    session.add_recent_search("ran").await;
    assert_eq!(session.recent_searches().await.queries(), ["ran"]);
}
