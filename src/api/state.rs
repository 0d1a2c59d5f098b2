use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::middleware::SessionId;
use crate::services::{history::DEFAULT_HISTORY_CAPACITY, CatalogStore, Session};

/// Minutes a session may sit untouched before it is discarded
pub const DEFAULT_SESSION_IDLE_MINUTES: i64 = 30;

/// Most sessions held at once; the least recently seen is evicted past this
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// How sessions are sized and when they end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionLimits {
    pub history_capacity: usize,
    pub idle_timeout: Duration,
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            idle_timeout: Duration::minutes(DEFAULT_SESSION_IDLE_MINUTES),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// Shared application state
///
/// The catalog is immutable and shared as-is; sessions sit behind a lock so
/// that mutations of any one session are applied one at a time.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub inner: Arc<RwLock<AppStateInner>>,
    /// Reason the catalog fell back to empty, if it did
    pub catalog_warning: Option<Arc<str>>,
    pub session_limits: SessionLimits,
}

/// Inner state that can be modified
#[derive(Default)]
pub struct AppStateInner {
    pub sessions: HashMap<SessionId, Session>,
}

impl AppStateInner {
    /// The caller's session, created on first use
    pub fn session_mut(&mut self, id: SessionId, limits: &SessionLimits) -> &mut Session {
        self.session_mut_at(id, limits, Utc::now())
    }

    /// Like [`session_mut`](Self::session_mut) with an explicit clock.
    ///
    /// Every write first drops idle sessions; creating a session past
    /// `max_sessions` evicts the least recently seen one.
    pub fn session_mut_at(
        &mut self,
        id: SessionId,
        limits: &SessionLimits,
        now: DateTime<Utc>,
    ) -> &mut Session {
        self.prune_idle(now, limits.idle_timeout);

        if !self.sessions.contains_key(&id) {
            self.evict_down_to(limits.max_sessions.max(1) - 1);
            tracing::debug!(session_id = %id, "Starting session");
        }

        let session = self
            .sessions
            .entry(id)
            .or_insert_with(|| Session::started_at(limits.history_capacity, now));
        session.last_seen = now;
        session
    }

    /// Read access that ignores sessions which have already gone idle
    pub fn active_session(
        &self,
        id: &SessionId,
        limits: &SessionLimits,
        now: DateTime<Utc>,
    ) -> Option<&Session> {
        self.sessions
            .get(id)
            .filter(|session| !session.is_idle(now, limits.idle_timeout))
    }

    /// Ends a session, returning whether it existed
    pub fn end_session(&mut self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Drops sessions idle past `idle_timeout`, returning how many went
    pub fn prune_idle(&mut self, now: DateTime<Utc>, idle_timeout: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| !session.is_idle(now, idle_timeout));

        let pruned = before - self.sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, remaining = self.sessions.len(), "Pruned idle sessions");
        }
        pruned
    }

    fn evict_down_to(&mut self, keep: usize) {
        while self.sessions.len() > keep {
            let stalest = self
                .sessions
                .iter()
                .min_by_key(|(_, session)| session.last_seen)
                .map(|(id, _)| *id);
            match stalest {
                Some(id) => {
                    self.sessions.remove(&id);
                    tracing::debug!(session_id = %id, "Evicted least recently seen session");
                }
                None => break,
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CatalogStore::empty())
    }
}

impl AppState {
    /// Creates application state around a loaded catalog
    pub fn new(catalog: CatalogStore) -> Self {
        Self {
            catalog: Arc::new(catalog),
            inner: Arc::new(RwLock::new(AppStateInner::default())),
            catalog_warning: None,
            session_limits: SessionLimits::default(),
        }
    }

    pub fn with_history_capacity(mut self, history_capacity: usize) -> Self {
        self.session_limits.history_capacity = history_capacity;
        self
    }

    pub fn with_session_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.session_limits.idle_timeout = idle_timeout;
        self
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.session_limits.max_sessions = max_sessions.max(1);
        self
    }

    pub fn with_catalog_warning(mut self, warning: Option<String>) -> Self {
        self.catalog_warning = warning.map(Arc::from);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;

    fn limits() -> SessionLimits {
        SessionLimits {
            history_capacity: 5,
            idle_timeout: Duration::minutes(30),
            max_sessions: 3,
        }
    }

    #[test]
    fn test_session_created_once_and_touched() {
        let mut inner = AppStateInner::default();
        let id = SessionId::new();
        let start = Utc::now();

        inner
            .session_mut_at(id, &limits(), start)
            .watchlist
            .add(1, ContentType::Movie);
        let later = start + Duration::minutes(5);
        let session = inner.session_mut_at(id, &limits(), later);

        assert!(session.watchlist.contains(1, ContentType::Movie));
        assert_eq!(session.last_seen, later);
        assert_eq!(session.history.capacity(), 5);
        assert_eq!(inner.sessions.len(), 1);
    }

    #[test]
    fn test_idle_sessions_expire_on_write() {
        let mut inner = AppStateInner::default();
        let stale = SessionId::new();
        let fresh = SessionId::new();
        let start = Utc::now();

        inner.session_mut_at(stale, &limits(), start);
        inner.session_mut_at(fresh, &limits(), start + Duration::minutes(20));

        let now = start + Duration::minutes(45);
        assert!(inner.active_session(&stale, &limits(), now).is_none());
        assert!(inner.active_session(&fresh, &limits(), now).is_some());

        inner.session_mut_at(fresh, &limits(), now);
        assert!(!inner.sessions.contains_key(&stale));
        assert_eq!(inner.sessions.len(), 1);
    }

    #[test]
    fn test_expired_session_restarts_empty() {
        let mut inner = AppStateInner::default();
        let id = SessionId::new();
        let start = Utc::now();

        inner
            .session_mut_at(id, &limits(), start)
            .watchlist
            .add(1, ContentType::Movie);
        let session = inner.session_mut_at(id, &limits(), start + Duration::hours(2));
        assert!(session.watchlist.is_empty());
    }

    #[test]
    fn test_new_sessions_evict_least_recently_seen() {
        let mut inner = AppStateInner::default();
        let start = Utc::now();
        let ids: Vec<SessionId> = (0..5).map(|_| SessionId::new()).collect();

        for (minute, id) in ids.iter().enumerate() {
            inner.session_mut_at(*id, &limits(), start + Duration::minutes(minute as i64));
        }

        assert_eq!(inner.sessions.len(), 3);
        assert!(!inner.sessions.contains_key(&ids[0]));
        assert!(!inner.sessions.contains_key(&ids[1]));
        assert!(ids[2..].iter().all(|id| inner.sessions.contains_key(id)));
    }

    #[test]
    fn test_end_session() {
        let mut inner = AppStateInner::default();
        let id = SessionId::new();
        inner.session_mut(id, &limits());

        assert!(inner.end_session(&id));
        assert!(!inner.end_session(&id));
        assert!(inner.sessions.is_empty());
    }
}
