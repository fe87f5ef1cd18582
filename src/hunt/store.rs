// src/hunt/store.rs

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::session::HuntSession;

struct SessionEntry {
    session: HuntSession,
    last_seen: DateTime<Utc>,
}

/// In-memory sessions keyed by session id. Each entry is touched only by
/// requests carrying its id, so sessions never observe each other.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh `NotStarted` session and returns its id.
    pub async fn create(&self, now: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        let entry = SessionEntry {
            session: HuntSession::new(),
            last_seen: now,
        };
        self.inner.lock().await.insert(id, entry);
        tracing::debug!(session = %id, "Session created");
        id
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.inner.lock().await.contains_key(&id)
    }

    /// Runs `f` against the session, marking it as seen.
    /// Returns `None` when the id is unknown (never issued or already purged).
    pub async fn with_session<F, R>(&self, id: Uuid, now: DateTime<Utc>, f: F) -> Option<R>
    where
        F: FnOnce(&mut HuntSession) -> R,
    {
        let mut sessions = self.inner.lock().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = now;
        Some(f(&mut entry.session))
    }

    /// Drops sessions not seen for longer than `ttl` seconds.
    pub async fn purge_idle(&self, ttl: u64, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::seconds(ttl as i64);
        let mut sessions = self.inner.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen >= cutoff);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
