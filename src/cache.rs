//! Bounded response cache for AI rankings.
//!
//! Pure optimization state, never a source of truth: losing an entry costs
//! a model call, nothing more. Eviction is by first-insertion order, not
//! LRU - overwriting or re-reading a key does not refresh its position.
//! The sweep runs lazily on insert once the interval has elapsed, and is
//! public so an owner can also drive it from a background task. The clock
//! is injected so tests advance time instead of waiting an hour.

use crate::recipe::RankedRecipe;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Time source for sweep scheduling.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Slot {
    value: Vec<RankedRecipe>,
    /// Monotonic insertion sequence number. Assigned once, on first insert.
    inserted: u64,
}

/// Bounded key -> ranked-list store.
pub struct ResponseCache {
    slots: HashMap<String, Slot>,
    next_insertion: u64,
    max_size: usize,
    sweep_interval: Duration,
    last_sweep: Instant,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(max_size: usize, sweep_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        let last_sweep = clock.now();
        Self {
            slots: HashMap::new(),
            next_insertion: 0,
            max_size,
            sweep_interval,
            last_sweep,
            clock,
        }
    }

    /// Cached value for a key. Reads never touch insertion order.
    pub fn get(&self, key: &str) -> Option<&Vec<RankedRecipe>> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    /// Store a value. Overwriting an existing key replaces the value but
    /// keeps the original insertion position.
    pub fn set(&mut self, key: String, value: Vec<RankedRecipe>) {
        if self.clock.now().duration_since(self.last_sweep) >= self.sweep_interval {
            self.sweep();
        }

        match self.slots.get_mut(&key) {
            Some(slot) => slot.value = value,
            None => {
                let inserted = self.next_insertion;
                self.next_insertion += 1;
                self.slots.insert(key, Slot { value, inserted });
            }
        }
    }

    /// Evict the oldest half when the entry count exceeds the cap.
    pub fn sweep(&mut self) {
        self.last_sweep = self.clock.now();
        if self.slots.len() <= self.max_size {
            return;
        }

        let evict = self.max_size / 2;
        let mut by_age: Vec<(String, u64)> = self
            .slots
            .iter()
            .map(|(key, slot)| (key.clone(), slot.inserted))
            .collect();
        by_age.sort_by_key(|(_, inserted)| *inserted);

        for (key, _) in by_age.into_iter().take(evict) {
            self.slots.remove(&key);
        }
        info!("Cache sweep evicted {} entries, {} remain", evict, self.slots.len());
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
