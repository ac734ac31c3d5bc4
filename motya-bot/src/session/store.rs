//! Per-chat conversation sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use prompt::ChatMessage;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::CappedHistory;

/// Shared handle to one chat's history. Hold the lock for the whole answer turn.
pub type Session = Arc<Mutex<CappedHistory<ChatMessage>>>;

struct Slot {
    session: Session,
    last_access: Instant,
}

/// Maps chat ids to capped histories. Sessions idle longer than `ttl` are dropped on the next
/// access to the store, whichever chat it is for.
pub struct SessionStore {
    capacity: usize,
    ttl: Option<Duration>,
    slots: Mutex<HashMap<i64, Slot>>,
}

impl SessionStore {
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        Self {
            capacity,
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub async fn session(&self, chat_id: i64) -> Session {
        let now = Instant::now();
        let mut slots = self.slots.lock().await;
        if let Some(ttl) = self.ttl {
            let before = slots.len();
            slots.retain(|_, slot| now.duration_since(slot.last_access) <= ttl);
            let dropped = before - slots.len();
            if dropped > 0 {
                debug!(dropped = dropped, "Idle sessions expired");
            }
        }
        let slot = slots.entry(chat_id).or_insert_with(|| Slot {
            session: Arc::new(Mutex::new(CappedHistory::new(self.capacity))),
            last_access: now,
        });
        slot.last_access = now;
        slot.session.clone()
    }

    /// Empties the chat's history.
    pub async fn clear(&self, chat_id: i64) {
        let session = self.session(chat_id).await;
        session.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt::exchange;

    #[tokio::test]
    async fn sessions_are_per_chat() {
        let store = SessionStore::new(10, None);
        store.session(1).await.lock().await.add(exchange("a", "b"));
        assert_eq!(store.session(1).await.lock().await.len(), 2);
        assert!(store.session(2).await.lock().await.is_empty());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn clear_resets_history() {
        let store = SessionStore::new(10, None);
        store.session(1).await.lock().await.add(exchange("a", "b"));
        store.clear(1).await;
        assert!(store.session(1).await.lock().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_expire() {
        let store = SessionStore::new(10, Some(Duration::from_secs(60)));
        store.session(1).await.lock().await.add(exchange("a", "b"));

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(store.session(1).await.lock().await.len(), 2);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(store.session(1).await.lock().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_of_other_chats_are_dropped() {
        let store = SessionStore::new(10, Some(Duration::from_secs(60)));
        for chat_id in 0..1000 {
            store.session(chat_id).await;
        }
        assert_eq!(store.len().await, 1000);

        tokio::time::advance(Duration::from_secs(3600)).await;
        store.session(5000).await;
        assert_eq!(store.len().await, 1);
    }
}
