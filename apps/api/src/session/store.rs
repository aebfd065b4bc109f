use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::Session;

/// In-memory session registry. Closures run under the lock and cannot await,
/// so no lock is ever held across an LLM call.
///
/// Sessions idle for longer than `retention` are pruned on insert unless a
/// background task is still running on them. Completed results stay
/// downloadable from the result files.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    retention: Duration,
}

impl SessionStore {
    pub fn new(retention: Duration) -> Self {
        Self {
            inner: Arc::default(),
            retention,
        }
    }

    pub async fn insert(&self, session: Session) {
        let mut sessions = self.inner.write().await;
        let cutoff = Utc::now() - self.retention;
        let before = sessions.len();
        sessions.retain(|_, s| s.is_running() || s.updated_at > cutoff);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle sessions");
        }
        sessions.insert(session.id, session);
    }

    /// Runs `f` on the session under a read lock. `None` if unknown.
    pub async fn read<T>(&self, id: Uuid, f: impl FnOnce(&Session) -> T) -> Option<T> {
        self.inner.read().await.get(&id).map(f)
    }

    /// Runs `f` on the session under a write lock. `None` if unknown.
    pub async fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        self.inner.write().await.get_mut(&id).map(|session| {
            let out = f(session);
            session.updated_at = Utc::now();
            out
        })
    }
}
