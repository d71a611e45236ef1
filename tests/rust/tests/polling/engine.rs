//! End-to-end engine tests on paused time

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use teamwatch_notifier::{DependenciesBuilder, NotifierConfig, NotifierEngine};
use tests::fixtures::{members, session};
use tests::{
    MockMemberRepository, MockSubscriberRepository, RecordingTransport, ScriptedRosterSource,
    ScriptedStatusSource,
};

struct Wiring {
    roster: Arc<ScriptedRosterSource>,
    status: Arc<ScriptedStatusSource>,
    members: Arc<MockMemberRepository>,
    transport: Arc<RecordingTransport>,
}

fn start(subscribers: &[i64]) -> (NotifierEngine, Wiring) {
    let wiring = Wiring {
        roster: Arc::new(ScriptedRosterSource::new()),
        status: Arc::new(ScriptedStatusSource::new()),
        members: Arc::new(MockMemberRepository::new()),
        transport: Arc::new(RecordingTransport::new()),
    };

    wiring.roster.push_members(members(&["alice", "bob"]));

    let deps = DependenciesBuilder::new()
        .with_member_repo(wiring.members.clone())
        .with_subscriber_repo(Arc::new(
            MockSubscriberRepository::new().with_active(subscribers),
        ))
        .with_status_source(wiring.status.clone())
        .with_roster_source(wiring.roster.clone())
        .with_transport(wiring.transport.clone())
        .build()
        .expect("all dependencies provided");

    let engine = NotifierEngine::start(&NotifierConfig::default(), deps);
    (engine, wiring)
}

#[tokio::test(start_paused = true)]
async fn test_engine_notifies_each_game_once() {
    let (engine, wiring) = start(&[1, 2]);
    for _ in 0..5 {
        wiring.status.push_sessions(vec![session("alice", "g1")]);
    }

    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(wiring.members.ids(), vec!["alice", "bob"]);
    assert!(wiring.status.call_count() >= 5);
    assert!(wiring
        .status
        .calls()
        .iter()
        .all(|ids| ids == &vec!["alice".to_string(), "bob".to_string()]));

    assert_eq!(wiring.transport.sent_to(1), vec!["https://lichess.org/g1"]);
    assert_eq!(wiring.transport.sent_to(2), vec!["https://lichess.org/g1"]);
    assert_eq!(engine.cache().len(), 1);

    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_polling() {
    let (engine, wiring) = start(&[1]);

    tokio::time::sleep(Duration::from_secs(30)).await;
    engine.shutdown().await;
    let calls = wiring.status.call_count();

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(wiring.status.call_count(), calls);
}

#[test]
fn test_builder_requires_every_dependency() {
    let result = DependenciesBuilder::new()
        .with_member_repo(Arc::new(MockMemberRepository::new()))
        .build();

    assert!(result.is_err());
}
