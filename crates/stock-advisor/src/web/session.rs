//! Server-side sessions keyed by a signed cookie

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "stock_advisor_session";

/// Sessions unused for this long are dropped
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Debug, Clone)]
struct Session {
    username: String,
    last_seen: Instant,
}

/// In-memory store of logged-in users
///
/// Only successful logins create entries. Logout removes the entry, a new
/// login from the same browser replaces it, and idle entries are evicted
/// whenever a session is created.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Start a session for `username`
    pub async fn create(&self, username: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions);
        sessions.insert(
            id,
            Session {
                username: username.into(),
                last_seen: Instant::now(),
            },
        );
        id
    }

    /// Username of a live session; refreshes its idle timer
    pub async fn username(&self, id: Uuid) -> Option<String> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        if session.last_seen.elapsed() > self.idle_timeout {
            sessions.remove(&id);
            return None;
        }
        session.last_seen = Instant::now();
        Some(session.username.clone())
    }

    /// End a session; returns false if there was none
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop every idle session now
    pub async fn purge_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, Session>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, session| session.last_seen.elapsed() <= self.idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, "idle sessions evicted");
        }
        evicted
    }
}

/// Session id carried by the request, if the cookie is present and valid
pub fn session_id(jar: &SignedCookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

pub fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie that tells the browser to forget its session
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
