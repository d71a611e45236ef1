//! Mock implementations for testing
//!
//! In-memory repositories, scripted Lichess sources and a recording message
//! transport for fast, isolated tests of the polling engine and the bot.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;

use teamwatch_core::{
    ActiveSession, MemberRepository, RepoResult, Subscriber, SubscriberRepository, TrackedMember,
};
use teamwatch_notifier::{FetchError, MessageTransport, RosterSource, StatusSource, TransportError};

// ============================================================================
// MockMemberRepository
// ============================================================================

#[derive(Default)]
pub struct MockMemberRepository {
    members: RwLock<BTreeMap<String, TrackedMember>>,
    failing_inserts: RwLock<HashSet<String>>,
    fail_list: AtomicBool,
    insert_calls: RwLock<Vec<String>>,
}

impl MockMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(self, member: TrackedMember) -> Self {
        self.members
            .write()
            .unwrap()
            .insert(member.external_id.clone(), member);
        self
    }

    /// Make inserting `id` fail
    pub fn with_failing_insert(self, id: &str) -> Self {
        self.failing_inserts.write().unwrap().insert(id.to_string());
        self
    }

    /// Make `list_known_ids` fail
    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Persisted ids, sorted
    pub fn ids(&self) -> Vec<String> {
        self.members.read().unwrap().keys().cloned().collect()
    }

    /// Every id `insert` was called with, in call order
    pub fn insert_calls(&self) -> Vec<String> {
        self.insert_calls.read().unwrap().clone()
    }
}

#[async_trait]
impl MemberRepository for MockMemberRepository {
    async fn list_known_ids(&self) -> RepoResult<Vec<String>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(anyhow!("member store unavailable"));
        }
        Ok(self.ids())
    }

    async fn insert(&self, member: &TrackedMember) -> RepoResult<()> {
        self.insert_calls
            .write()
            .unwrap()
            .push(member.external_id.clone());

        if self
            .failing_inserts
            .read()
            .unwrap()
            .contains(&member.external_id)
        {
            return Err(anyhow!("insert failed for {}", member.external_id));
        }

        self.members
            .write()
            .unwrap()
            .entry(member.external_id.clone())
            .or_insert_with(|| member.clone());
        Ok(())
    }
}

// ============================================================================
// MockSubscriberRepository
// ============================================================================

#[derive(Default)]
pub struct MockSubscriberRepository {
    subscribers: RwLock<BTreeMap<i64, Subscriber>>,
    failing: AtomicBool,
}

impl MockSubscriberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate active subscribers
    pub fn with_active(self, ids: &[i64]) -> Self {
        {
            let mut subscribers = self.subscribers.write().unwrap();
            for id in ids {
                subscribers.insert(*id, Subscriber::new(*id));
            }
        }
        self
    }

    /// Make every call fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> RepoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("subscriber store unavailable"));
        }
        Ok(())
    }

    pub fn is_active(&self, id: i64) -> bool {
        self.subscribers
            .read()
            .unwrap()
            .get(&id)
            .map(|s| s.is_active)
            .unwrap_or(false)
    }
}

#[async_trait]
impl SubscriberRepository for MockSubscriberRepository {
    async fn list_active_ids(&self) -> RepoResult<Vec<i64>> {
        self.check()?;
        Ok(self
            .subscribers
            .read()
            .unwrap()
            .values()
            .filter(|s| s.is_active)
            .map(|s| s.recipient_id)
            .collect())
    }

    async fn get(&self, recipient_id: i64) -> RepoResult<Option<Subscriber>> {
        self.check()?;
        Ok(self.subscribers.read().unwrap().get(&recipient_id).cloned())
    }

    async fn activate(&self, recipient_id: i64) -> RepoResult<()> {
        self.check()?;
        self.subscribers
            .write()
            .unwrap()
            .entry(recipient_id)
            .and_modify(|s| s.is_active = true)
            .or_insert_with(|| Subscriber::new(recipient_id));
        Ok(())
    }

    async fn deactivate(&self, recipient_id: i64) -> RepoResult<()> {
        self.check()?;
        if let Some(s) = self.subscribers.write().unwrap().get_mut(&recipient_id) {
            s.is_active = false;
        }
        Ok(())
    }

    async fn count_active(&self) -> RepoResult<usize> {
        Ok(self.list_active_ids().await?.len())
    }
}

// ============================================================================
// RecordingTransport
// ============================================================================

/// Records every delivered message; configured recipients fail
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(i64, String)>>,
    failing: RwLock<HashSet<i64>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(self, ids: &[i64]) -> Self {
        self.failing.write().unwrap().extend(ids.iter().copied());
        self
    }

    /// Successful deliveries in order
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().clone()
    }

    pub fn sent_to(&self, recipient_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|(id, _)| *id == recipient_id)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send(&self, recipient_id: i64, text: &str) -> Result<(), TransportError> {
        if self.failing.read().unwrap().contains(&recipient_id) {
            return Err(TransportError::Rejected {
                status: StatusCode::FORBIDDEN,
                description: "Forbidden: bot was blocked by the user".to_string(),
            });
        }
        self.sent.lock().push((recipient_id, text.to_string()));
        Ok(())
    }
}

// ============================================================================
// ScriptedStatusSource
// ============================================================================

/// Replays queued responses; an empty script answers "nobody is playing"
#[derive(Default)]
pub struct ScriptedStatusSource {
    script: Mutex<VecDeque<Option<Vec<ActiveSession>>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedStatusSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_sessions(&self, sessions: Vec<ActiveSession>) {
        self.script.lock().push_back(Some(sessions));
    }

    pub fn push_failure(&self) {
        self.script.lock().push_back(None);
    }

    /// Member ids passed to each fetch
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl StatusSource for ScriptedStatusSource {
    async fn fetch_active(&self, member_ids: &[&str]) -> Result<Vec<ActiveSession>, FetchError> {
        self.calls
            .lock()
            .push(member_ids.iter().map(|id| id.to_string()).collect());

        match self.script.lock().pop_front() {
            Some(Some(sessions)) => Ok(sessions),
            Some(None) => Err(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE)),
            None => Ok(Vec::new()),
        }
    }
}

// ============================================================================
// ScriptedRosterSource
// ============================================================================

/// Replays queued rosters; an empty script is a fetch failure
#[derive(Default)]
pub struct ScriptedRosterSource {
    script: Mutex<VecDeque<Option<Vec<TrackedMember>>>>,
}

impl ScriptedRosterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_members(&self, members: Vec<TrackedMember>) {
        self.script.lock().push_back(Some(members));
    }

    pub fn push_failure(&self) {
        self.script.lock().push_back(None);
    }
}

#[async_trait]
impl RosterSource for ScriptedRosterSource {
    async fn fetch_members(&self) -> Result<Vec<TrackedMember>, FetchError> {
        match self.script.lock().pop_front() {
            Some(Some(members)) => Ok(members),
            Some(None) | None => Err(FetchError::Status(StatusCode::BAD_GATEWAY)),
        }
    }
}
