//! In-memory platform facades.
//!
//! Scripted stand-ins for the Helix API and chat transport, used by tests
//! and by hosts that replay recorded traffic.

use super::{ChatChannels, CreatedClip, EventHub, HelixApi, HelixUser};
use crate::connection::{Connection, ConnectionCredentials, ConnectionFactory};
use crate::error::{AdapterError, RemoteError};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A request observed by `ScriptedHelix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelixCall {
    GetUsers(Vec<String>),
    CreateClip { broadcaster_id: String, has_delay: bool },
}

/// Helix facade answering from an in-memory user table.
#[derive(Default)]
pub struct ScriptedHelix {
    users: Mutex<HashMap<String, HelixUser>>,
    calls: Mutex<Vec<HelixCall>>,
    fail_with: Mutex<Option<(u16, String)>>,
    clip_counter: Mutex<u64>,
}

impl ScriptedHelix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, id: &str, login: &str) {
        self.users.lock().insert(
            id.to_string(),
            HelixUser {
                id: id.to_string(),
                login: login.to_string(),
                display_name: login.to_string(),
                user_type: String::new(),
                broadcaster_type: String::new(),
                description: String::new(),
                profile_image_url: String::new(),
                offline_image_url: String::new(),
                created_at: None,
            },
        );
    }

    /// Make every following call fail with the given HTTP status.
    pub fn fail_with(&self, status: u16, body: &str) {
        *self.fail_with.lock() = Some((status, body.to_string()));
    }

    pub fn recover(&self) {
        *self.fail_with.lock() = None;
    }

    pub fn calls(&self) -> Vec<HelixCall> {
        self.calls.lock().clone()
    }

    fn check_failure(&self, endpoint: &str) -> Result<(), RemoteError> {
        match self.fail_with.lock().as_ref() {
            Some((status, body)) => Err(RemoteError::Http {
                endpoint: endpoint.to_string(),
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl HelixApi for ScriptedHelix {
    fn get_users(&self, ids: &[String]) -> Result<Vec<HelixUser>, RemoteError> {
        self.calls.lock().push(HelixCall::GetUsers(ids.to_vec()));
        self.check_failure("/users")?;
        let users = self.users.lock();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    fn create_clip(
        &self,
        broadcaster_id: &str,
        has_delay: bool,
    ) -> Result<Vec<CreatedClip>, RemoteError> {
        self.calls.lock().push(HelixCall::CreateClip {
            broadcaster_id: broadcaster_id.to_string(),
            has_delay,
        });
        self.check_failure("/clips")?;

        let mut counter = self.clip_counter.lock();
        *counter += 1;
        let id = format!("{}-clip-{}", broadcaster_id, *counter);
        Ok(vec![CreatedClip {
            edit_url: format!("https://clips.twitch.tv/{}/edit", id),
            id,
        }])
    }
}

/// Chat membership facade that records join attempts.
#[derive(Default)]
pub struct MemoryChat {
    joined: Mutex<BTreeSet<String>>,
    join_attempts: Mutex<Vec<String>>,
    refuse_joins: Mutex<bool>,
}

impl MemoryChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following join fail.
    pub fn refuse_joins(&self, refuse: bool) {
        *self.refuse_joins.lock() = refuse;
    }

    pub fn join_attempts(&self) -> Vec<String> {
        self.join_attempts.lock().clone()
    }
}

impl ChatChannels for MemoryChat {
    fn is_channel_joined(&self, channel: &str) -> bool {
        self.joined.lock().contains(channel)
    }

    fn join_channel(&self, channel: &str) -> Result<(), RemoteError> {
        self.join_attempts.lock().push(channel.to_string());
        if *self.refuse_joins.lock() {
            return Err(RemoteError::Transport(format!(
                "join refused for #{}",
                channel
            )));
        }
        self.joined.lock().insert(channel.to_string());
        Ok(())
    }
}

/// Factory handing out connections backed by shared in-memory facades.
///
/// Every connection it builds shares the same `ScriptedHelix`, `MemoryChat`
/// and `EventHub`, so a test can drive events after the adapter connects.
pub struct MemoryConnectionFactory {
    helix: Arc<ScriptedHelix>,
    chat: Arc<MemoryChat>,
    events: EventHub,
    builds: AtomicUsize,
    fail: AtomicBool,
    build_delay: Option<Duration>,
    seen_client_ids: Mutex<Vec<String>>,
}

impl MemoryConnectionFactory {
    pub fn new() -> Self {
        Self {
            helix: Arc::new(ScriptedHelix::new()),
            chat: Arc::new(MemoryChat::new()),
            events: EventHub::new(),
            builds: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            build_delay: None,
            seen_client_ids: Mutex::new(Vec::new()),
        }
    }

    /// Sleep inside `build`, widening the window for racing starts.
    pub fn with_build_delay(mut self, delay: Duration) -> Self {
        self.build_delay = Some(delay);
        self
    }

    pub fn helix(&self) -> &Arc<ScriptedHelix> {
        &self.helix
    }

    pub fn chat(&self) -> &Arc<MemoryChat> {
        &self.chat
    }

    pub fn events(&self) -> &EventHub {
        &self.events
    }

    pub fn fail_builds(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn seen_client_ids(&self) -> Vec<String> {
        self.seen_client_ids.lock().clone()
    }
}

impl Default for MemoryConnectionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionFactory for MemoryConnectionFactory {
    fn build(&self, credentials: ConnectionCredentials<'_>) -> Result<Connection, AdapterError> {
        if let Some(delay) = self.build_delay {
            std::thread::sleep(delay);
        }
        self.seen_client_ids
            .lock()
            .push(credentials.client_id.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(AdapterError::Connection(
                "memory factory configured to fail".to_string(),
            ));
        }
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(Connection::new(
            self.helix.clone(),
            self.events.clone(),
            self.chat.clone(),
        ))
    }
}
