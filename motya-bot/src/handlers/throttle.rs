//! Per-user rate limiting.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Remembers when each user last passed each key, and the rate that applied. Entries whose
/// rate has elapsed are swept on every allowed call.
#[derive(Default)]
pub struct Throttle {
    last: Mutex<HashMap<(&'static str, i64), (Instant, Duration)>>,
}

impl Throttle {
    pub fn new() -> Self {
        Self::default()
    }

    /// True (and records the call) when `rate` has passed since the user's last allowed call
    /// under `key`. Rejected calls do not extend the wait.
    pub async fn allow(&self, key: &'static str, user_id: i64, rate: Duration) -> bool {
        let now = Instant::now();
        let mut last = self.last.lock().await;
        match last.get(&(key, user_id)) {
            Some((at, _)) if now.duration_since(*at) < rate => false,
            _ => {
                last.retain(|_, (at, window)| now.duration_since(*at) < *window);
                last.insert((key, user_id), (now, rate));
                true
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.last.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.last.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn rejects_calls_within_rate() {
        let throttle = Throttle::new();
        let rate = Duration::from_secs(5);
        assert!(throttle.allow("draw", 1, rate).await);
        assert!(!throttle.allow("draw", 1, rate).await);
        assert!(throttle.allow("draw", 2, rate).await);
        assert!(throttle.allow("message", 1, rate).await);

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(throttle.allow("draw", 1, rate).await);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_entries_are_forgotten() {
        let throttle = Throttle::new();
        for user_id in 0..100 {
            assert!(throttle.allow("message", user_id, Duration::from_secs(1)).await);
        }
        assert!(throttle.allow("draw", 0, Duration::from_secs(10)).await);
        assert_eq!(throttle.len().await, 101);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(throttle.allow("message", 500, Duration::from_secs(1)).await);
        assert_eq!(throttle.len().await, 2);
        assert!(!throttle.allow("draw", 0, Duration::from_secs(10)).await);
    }
}
