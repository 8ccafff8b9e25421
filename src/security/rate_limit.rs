// src/security/rate_limit.rs — Fixed-window request limiter
//
// Each key gets a window of `window_seconds` starting at its first request.
// Requests inside the window increment a counter; once the counter passes
// `limit` the key is refused until the window ends. Bursts across a window
// boundary are allowed. State is per process only.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Default period of the expired-entry sweep.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Longest accepted window. Larger values are clamped to it.
pub const MAX_WINDOW_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Counter state for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_time: Instant,
}

/// Outcome of a single check, safe to hand to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_in_seconds: u64,
}

impl RateLimitResult {
    /// User-facing retry guidance for a rejected request.
    pub fn retry_message(&self) -> String {
        match self.reset_in_seconds {
            1 => "Too many requests. Please try again in 1 second.".into(),
            secs => format!("Too many requests. Please try again in {secs} seconds."),
        }
    }
}

/// Backing storage for limiter entries.
///
/// `upsert` must run `update` and store its result atomically with respect
/// to other calls for the same key, otherwise concurrent requests lose counts.
pub trait RateLimitStore: Send + Sync {
    fn upsert(
        &self,
        key: &str,
        update: &mut dyn FnMut(Option<RateLimitEntry>) -> RateLimitEntry,
    ) -> RateLimitEntry;

    /// Drop every entry whose window has ended by `now`. Returns how many went.
    fn remove_expired(&self, now: Instant) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process store: one map behind one mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, RateLimitEntry>> {
        // A panic while holding the lock cannot leave an entry half-written.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RateLimitStore for MemoryStore {
    fn upsert(
        &self,
        key: &str,
        update: &mut dyn FnMut(Option<RateLimitEntry>) -> RateLimitEntry,
    ) -> RateLimitEntry {
        let mut entries = self.lock();
        let next = update(entries.get(key).copied());
        entries.insert(key.to_string(), next);
        next
    }

    fn remove_expired(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| now < entry.reset_time);
        before - entries.len()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Fixed-window limiter over an injectable store. Cheap to clone.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn RateLimitStore>) -> Self {
        Self { store }
    }

    /// Count a request for `key` against `limit` per `window_seconds`.
    pub fn check(&self, key: &str, limit: u32, window_seconds: u64) -> RateLimitResult {
        self.check_at(key, limit, window_seconds, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    pub fn check_at(
        &self,
        key: &str,
        limit: u32,
        window_seconds: u64,
        now: Instant,
    ) -> RateLimitResult {
        let window = Duration::from_secs(window_seconds.min(MAX_WINDOW_SECONDS));

        let entry = self.store.upsert(key, &mut |existing| match existing {
            Some(entry) if now < entry.reset_time => RateLimitEntry {
                count: entry.count.saturating_add(1),
                reset_time: entry.reset_time,
            },
            _ => RateLimitEntry {
                count: 1,
                reset_time: now.checked_add(window).unwrap_or(now),
            },
        });

        let reset_in_seconds = ceil_secs(entry.reset_time.saturating_duration_since(now));

        // A fresh window always admits its first request.
        if entry.count == 1 {
            return RateLimitResult {
                allowed: true,
                limit,
                remaining: limit.saturating_sub(1),
                reset_in_seconds,
            };
        }

        if entry.count > limit {
            tracing::debug!(key, count = entry.count, limit, "rate limit exceeded");
            return RateLimitResult {
                allowed: false,
                limit,
                remaining: 0,
                reset_in_seconds,
            };
        }

        RateLimitResult {
            allowed: true,
            limit,
            remaining: limit - entry.count,
            reset_in_seconds,
        }
    }

    /// Remove expired entries now. Returns how many were dropped.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        self.store.remove_expired(now)
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.store.len()
    }

    /// Start the periodic sweep on the current tokio runtime. Dropping the
    /// returned handle stops it.
    pub fn spawn_sweeper(&self, interval: Duration) -> SweeperHandle {
        let limiter = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = limiter.sweep();
                if removed > 0 {
                    tracing::debug!(removed, remaining = limiter.tracked_keys(), "rate limit sweep");
                }
            }
        });
        SweeperHandle { task }
    }
}

/// Owns the background sweep task.
pub struct SweeperHandle {
    task: JoinHandle<()>,
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Whole seconds, rounded up.
pub fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}
