//! Active Alert Set Implementation

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A live alert entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEntry<K> {
    /// Alert identity
    pub key: K,
    /// Timestamp of the most recent raise (milliseconds, caller clock)
    pub raised_at_ms: u64,
    /// Number of times raised while live
    pub raise_count: u32,
}

/// Result of raising an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaiseOutcome {
    /// Alert was not live before this raise
    Inserted,
    /// Alert was already live; its clock was reset
    Refreshed,
}

/// Deduplicated, time-bounded set of live alerts
///
/// Entries are keyed by identity, so raising the same key twice keeps a
/// single entry. Raising a live key resets its clock. Entries are ordered
/// by most recent raise, oldest first.
#[derive(Debug, Clone)]
pub struct ActiveAlertSet<K> {
    /// Display window
    window: Duration,
    /// Live entries, ordered by last raise
    entries: Vec<ActiveEntry<K>>,
}

impl<K: Clone + PartialEq + std::fmt::Debug> ActiveAlertSet<K> {
    /// Create a new alert set with the given display window
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Vec::new(),
        }
    }

    /// Display window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replace the display window (applies to entries already live)
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// Raise an alert at `now_ms`
    pub fn raise(&mut self, key: K, now_ms: u64) -> RaiseOutcome {
        match self.entries.iter().position(|e| e.key == key) {
            Some(idx) => {
                let mut entry = self.entries.remove(idx);
                entry.raised_at_ms = now_ms;
                entry.raise_count += 1;
                self.entries.push(entry);
                RaiseOutcome::Refreshed
            }
            None => {
                debug!("Alert raised: {:?}", key);
                self.entries.push(ActiveEntry {
                    key,
                    raised_at_ms: now_ms,
                    raise_count: 1,
                });
                RaiseOutcome::Inserted
            }
        }
    }

    /// Whether `entry` is still live at `now_ms`
    fn is_entry_live(&self, entry: &ActiveEntry<K>, now_ms: u64) -> bool {
        u128::from(now_ms.saturating_sub(entry.raised_at_ms)) < self.window.as_millis()
    }

    /// Remove entries whose window has elapsed; returns how many were removed
    pub fn purge_expired(&mut self, now_ms: u64) -> usize {
        let before = self.entries.len();
        let window_ms = self.window.as_millis();
        self.entries
            .retain(|e| u128::from(now_ms.saturating_sub(e.raised_at_ms)) < window_ms);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Expired {} alert(s)", removed);
        }
        removed
    }

    /// Whether `key` is live at `now_ms`
    pub fn is_live(&self, key: &K, now_ms: u64) -> bool {
        self.entries
            .iter()
            .any(|e| &e.key == key && self.is_entry_live(e, now_ms))
    }

    /// Get the entry for `key`, if present
    pub fn get(&self, key: &K) -> Option<&ActiveEntry<K>> {
        self.entries.iter().find(|e| &e.key == key)
    }

    /// Entries, oldest raise first (call `purge_expired` first for a live view)
    pub fn entries(&self) -> &[ActiveEntry<K>] {
        &self.entries
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no alerts are held
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all alerts
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
