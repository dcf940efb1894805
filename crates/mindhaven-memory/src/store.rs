//! Session-keyed conversation store

use mindhaven_core::Turn;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Conversation memory for all sessions of this process
///
/// Volatile: nothing survives a restart. Logs grow for the lifetime of the
/// process; only the prompt window fed to the generator is capped, by the
/// caller.
#[derive(Default)]
pub struct ConversationStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl ConversationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for `id`, creating it on first use
    pub fn session(&self, id: &str) -> Arc<Session> {
        if let Some(session) = self.sessions.read().get(id) {
            return session.clone();
        }

        let mut sessions = self.sessions.write();
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!("Creating conversation session: {}", id);
                Arc::new(Session::new(id))
            })
            .clone()
    }

    /// Number of sessions seen so far
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

/// One session's ordered turn log
pub struct Session {
    id: String,
    turns: Mutex<Vec<Turn>>,
    /// Serializes concurrent requests for the same session
    request_lock: tokio::sync::Mutex<()>,
}

impl Session {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            turns: Mutex::new(Vec::new()),
            request_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Append a turn to the end of the log
    pub fn append(&self, turn: Turn) {
        self.turns.lock().push(turn);
    }

    /// Full history in insertion order
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.lock().clone()
    }

    /// Number of turns recorded so far
    pub fn turn_count(&self) -> usize {
        self.turns.lock().len()
    }

    /// Acquire the per-session request guard
    ///
    /// Held for the span of one request pipeline so same-session requests
    /// cannot interleave their user/assistant pairs. The turn log mutex is
    /// not part of this guard; external calls run with only this held.
    pub async fn request_guard(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.request_lock.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindhaven_core::Role;

    #[test]
    fn appends_preserve_insertion_order() {
        let store = ConversationStore::new();
        let session = store.session("s1");

        session.append(Turn::user("first"));
        session.append(Turn::assistant("second"));
        session.append(Turn::user("third"));

        let history = session.snapshot();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].content, "first");
        assert_eq!(history[1].content, "second");
        assert_eq!(history[2].content, "third");
    }

    #[test]
    fn sessions_are_isolated() {
        let store = ConversationStore::new();
        store.session("a").append(Turn::user("hello from a"));
        store.session("b").append(Turn::user("hello from b"));

        assert_eq!(store.session("a").turn_count(), 1);
        assert_eq!(store.session("b").turn_count(), 1);
        assert_eq!(store.session("a").snapshot()[0].content, "hello from a");
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn session_lookup_returns_same_log() {
        let store = ConversationStore::new();
        store.session("s").append(Turn::user("one"));
        store.session("s").append(Turn::assistant("two"));
        assert_eq!(store.session("s").turn_count(), 2);
        assert_eq!(store.session_count(), 1);
    }

    #[tokio::test]
    async fn request_guard_serializes_same_session() {
        let store = Arc::new(ConversationStore::new());
        let session = store.session("shared");

        let guard = session.request_guard().await;
        let contender = {
            let session = session.clone();
            tokio::spawn(async move {
                let _guard = session.request_guard().await;
                session.append(Turn::user("second request"));
            })
        };

        // While the guard is held the contender cannot append.
        tokio::task::yield_now().await;
        session.append(Turn::user("first request"));
        drop(guard);

        contender.await.unwrap();
        let history = session.snapshot();
        assert_eq!(history[0].content, "first request");
        assert_eq!(history[1].content, "second request");
    }

    #[tokio::test]
    async fn concurrent_sessions_do_not_block_each_other() {
        let store = Arc::new(ConversationStore::new());

        // Hold one session's guard while another session runs a request.
        let blocked = store.session("blocked");
        let _guard = blocked.request_guard().await;

        let other = store.session("other");
        let _other_guard = other.request_guard().await;
        other.append(Turn::new(Role::User, "independent"));
        assert_eq!(other.turn_count(), 1);
    }
}
