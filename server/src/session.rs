//! In-memory session store. Each session is the flat key/value map a game snapshot
//! is written into; no game object is kept between requests.
//!
//! Sessions idle for longer than the store's ttl are dropped the next time a
//! session is created or loaded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use uuid::Uuid;

pub type Session = HashMap<String, String>;

/// Same idle timeout as a web.py disk session: one day.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct Entry
{
    data: Session,
    touched: Instant,
}

impl Entry
{
    fn new(data: Session) -> Self
    {
        Self { data, touched: Instant::now() }
    }
}

#[derive(Clone)]
pub struct SessionStore
{
    sessions: Arc<Mutex<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl Default for SessionStore
{
    fn default() -> Self
    {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore
{
    pub fn new(ttl: Duration) -> Self
    {
        Self { sessions: Arc::new(Mutex::new(HashMap::new())), ttl }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>>
    {
        // Every write replaces a whole session, so a poisoned lock still holds whole sessions.
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Locks the map after dropping every session idle for longer than the ttl.
    fn lock_live(&self) -> MutexGuard<'_, HashMap<String, Entry>>
    {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, entry| entry.touched.elapsed() <= self.ttl);

        let expired = before - sessions.len();
        if expired > 0
        {
            tracing::debug!(expired, live = sessions.len(), "expired idle sessions");
        }
        sessions
    }

    /// Stores a new session and returns its id.
    pub fn create(&self, session: Session) -> String
    {
        let id = Uuid::new_v4().to_string();
        self.lock_live().insert(id.clone(), Entry::new(session));
        id
    }

    /// Returns a copy of a live session and marks it as used.
    pub fn load(&self, id: &str) -> Option<Session>
    {
        let mut sessions = self.lock_live();
        let entry = sessions.get_mut(id)?;
        entry.touched = Instant::now();
        Some(entry.data.clone())
    }

    /// Last write wins.
    pub fn save(&self, id: &str, session: Session)
    {
        self.lock().insert(id.to_string(), Entry::new(session));
    }

    pub fn len(&self) -> usize
    {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.lock().is_empty()
    }
}
