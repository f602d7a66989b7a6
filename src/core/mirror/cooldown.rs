//! Per-User Cooldown Tracking
//!
//! Bounded LRU map from user id to last-use instant. Capacity keeps the
//! tracker from growing with every user the bot ever sees; entries past
//! their cooldown are simply overwritten on the next acquire.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

/// Default number of tracked users.
pub const DEFAULT_COOLDOWN_CAPACITY: usize = 1024;

/// Outcome of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownState {
    /// The action may proceed; the clock has been restarted.
    Ready,
    /// The action is throttled for the remaining duration.
    Cooling { remaining: Duration },
}

/// Tracks per-key cooldowns with LRU-bounded memory.
pub struct CooldownTracker {
    entries: Mutex<LruCache<String, Instant>>,
    cooldown: Duration,
}

impl CooldownTracker {
    pub fn new(cooldown: Duration) -> Self {
        Self::with_capacity(cooldown, DEFAULT_COOLDOWN_CAPACITY)
    }

    pub fn with_capacity(cooldown: Duration, capacity: usize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity.max(1)).expect("capacity must be > 0"),
            )),
            cooldown,
        }
    }

    /// Check and arm the cooldown for `key` in one step.
    ///
    /// Returns `Ready` (and restarts the clock) when the key is unseen or
    /// its previous use is older than the cooldown; otherwise `Cooling`
    /// with the time left.
    pub fn try_acquire(&self, key: &str) -> CooldownState {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(last) = entries.get(key) {
            let elapsed = last.elapsed();
            if elapsed < self.cooldown {
                return CooldownState::Cooling {
                    remaining: self.cooldown - elapsed,
                };
            }
        }

        entries.put(key.to_string(), Instant::now());
        CooldownState::Ready
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}
