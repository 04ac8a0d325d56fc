use anyhow::Result;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::models::chat::{SessionId, Turn};

/// Transcript storage keyed by session id.
///
/// Every call is atomic for its session; implementations may live outside
/// the process (e.g. a key-value store with TTL).
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn exists(&self, session_id: &str) -> Result<bool>;

    async fn get(&self, session_id: &str) -> Result<Option<Vec<Turn>>>;

    /// Append `turns` in order. A missing or expired session is started
    /// from `seed` first, in the same atomic step.
    async fn append(&self, session_id: &str, seed: &[Turn], turns: &[Turn]) -> Result<()>;

    /// Store `seed` as the transcript unless the session already exists.
    /// Returns true when the session was created.
    async fn begin(&self, session_id: &str, seed: &[Turn]) -> Result<bool>;

    /// Number of live sessions (for monitoring)
    async fn count(&self) -> Result<usize>;
}

struct SessionEntry {
    turns: Vec<Turn>,
    last_access: Instant,
}

impl SessionEntry {
    fn new(turns: Vec<Turn>) -> Self {
        Self {
            turns,
            last_access: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_access.elapsed() > ttl
    }

    fn touch(&mut self) {
        self.last_access = Instant::now();
    }
}

/// Process-local session store.
/// Uses DashMap so appends to one session serialize on its shard lock.
#[derive(Clone)]
pub struct InMemorySessionStore {
    storage: Arc<DashMap<SessionId, SessionEntry>>,
    /// Idle time after which a session is forgotten
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        info!("Initializing in-memory session store (ttl: {:?})", ttl);
        Self {
            storage: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Drop idle sessions, returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let start_len = self.storage.len();
        let ttl = self.ttl;
        self.storage.retain(|_, entry| !entry.is_expired(ttl));

        let count = start_len.saturating_sub(self.storage.len());
        if count > 0 {
            info!("Purged {} expired sessions", count);
        }
        count
    }

    /// Periodically purge idle sessions until the runtime shuts down
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every.max(Duration::from_secs(1)));
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                store.purge_expired();
            }
        })
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn exists(&self, session_id: &str) -> Result<bool> {
        Ok(self
            .storage
            .get(session_id)
            .map(|entry| !entry.is_expired(self.ttl))
            .unwrap_or(false))
    }

    async fn get(&self, session_id: &str) -> Result<Option<Vec<Turn>>> {
        let Some(mut entry) = self.storage.get_mut(session_id) else {
            return Ok(None);
        };

        if entry.is_expired(self.ttl) {
            drop(entry); // Release shard lock
            self.storage.remove(session_id);
            debug!("Session {} expired, removed from store", session_id);
            return Ok(None);
        }

        entry.touch();
        Ok(Some(entry.turns.clone()))
    }

    async fn append(&self, session_id: &str, seed: &[Turn], turns: &[Turn]) -> Result<()> {
        match self.storage.entry(session_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry.is_expired(self.ttl) {
                    debug!("Session {} expired before append, reseeding", session_id);
                    entry.turns = seed.to_vec();
                }
                entry.turns.extend_from_slice(turns);
                entry.touch();
            }
            Entry::Vacant(vacant) => {
                let mut all = seed.to_vec();
                all.extend_from_slice(turns);
                vacant.insert(SessionEntry::new(all));
            }
        }
        Ok(())
    }

    async fn begin(&self, session_id: &str, seed: &[Turn]) -> Result<bool> {
        match self.storage.entry(session_id.to_string()) {
            Entry::Occupied(mut occupied) if !occupied.get().is_expired(self.ttl) => {
                occupied.get_mut().touch();
                Ok(false)
            }
            Entry::Occupied(mut occupied) => {
                occupied.insert(SessionEntry::new(seed.to_vec()));
                Ok(true)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(SessionEntry::new(seed.to_vec()));
                Ok(true)
            }
        }
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.len())
    }
}
