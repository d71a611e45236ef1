//! Repository integration tests

use pretty_assertions::assert_eq;
use teamwatch_core::{filter_new_members, MemberRepository, SubscriberRepository};
use teamwatch_storage::{SqliteMemberRepository, SqliteSubscriberRepository};
use tests::{db::TestDatabase, fixtures};

#[tokio::test]
async fn test_member_repository_persists_across_instances() {
    let (db, _dir) = TestDatabase::new().into_shared();

    let repo = SqliteMemberRepository::new(db.clone());
    for member in fixtures::members(&["carol", "alice", "bob"]) {
        repo.insert(&member).await.expect("insert");
    }

    let other = SqliteMemberRepository::new(db);
    assert_eq!(
        other.list_known_ids().await.unwrap(),
        vec!["alice", "bob", "carol"]
    );
}

#[tokio::test]
async fn test_member_insert_duplicate_keeps_original() {
    let (db, _dir) = TestDatabase::new().into_shared();
    let repo = SqliteMemberRepository::new(db.clone());

    repo.insert(&teamwatch_core::TrackedMember::new("alice", "Alice"))
        .await
        .unwrap();
    repo.insert(&teamwatch_core::TrackedMember::new("alice", "Renamed"))
        .await
        .expect("duplicate insert is not an error");

    assert_eq!(repo.list_known_ids().await.unwrap(), vec!["alice"]);

    let db = db.lock().await;
    let name: String = db
        .connection()
        .query_row(
            "SELECT display_name FROM tracked_members WHERE external_id = 'alice'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(name, "Alice");
}

#[tokio::test]
async fn test_diff_against_persisted_roster_inserts_only_new() {
    let (db, _dir) = TestDatabase::new().into_shared();
    let repo = SqliteMemberRepository::new(db);

    for member in fixtures::members(&["a", "b"]) {
        repo.insert(&member).await.unwrap();
    }

    let known = repo.list_known_ids().await.unwrap();
    let new_members = filter_new_members(&known, &fixtures::members(&["b", "c"]));
    assert_eq!(new_members, fixtures::members(&["c"]));

    for member in &new_members {
        repo.insert(member).await.unwrap();
    }
    assert_eq!(repo.list_known_ids().await.unwrap(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_subscriber_lifecycle() {
    let (db, _dir) = TestDatabase::new().into_shared();
    let repo = SqliteSubscriberRepository::new(db);

    repo.activate(10).await.unwrap();
    repo.activate(20).await.unwrap();
    repo.activate(30).await.unwrap();
    assert_eq!(repo.list_active_ids().await.unwrap(), vec![10, 20, 30]);

    repo.deactivate(20).await.unwrap();
    assert_eq!(repo.list_active_ids().await.unwrap(), vec![10, 30]);
    assert_eq!(repo.count_active().await.unwrap(), 2);

    let stopped = repo.get(20).await.unwrap().expect("row kept after stop");
    assert!(!stopped.is_active);

    // Re-subscribing reactivates the existing row
    repo.activate(20).await.unwrap();
    let resumed = repo.get(20).await.unwrap().unwrap();
    assert!(resumed.is_active);
    assert_eq!(resumed.created_at, stopped.created_at);
    assert_eq!(repo.count_active().await.unwrap(), 3);
}

#[tokio::test]
async fn test_deactivate_unknown_subscriber_is_ignored() {
    let (db, _dir) = TestDatabase::new().into_shared();
    let repo = SqliteSubscriberRepository::new(db);

    repo.deactivate(99).await.expect("unknown id is not an error");
    assert!(repo.get(99).await.unwrap().is_none());
    assert_eq!(repo.count_active().await.unwrap(), 0);
}
