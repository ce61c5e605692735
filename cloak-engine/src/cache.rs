//! Extraction result caching
//!
//! An LRU store keyed by a canonical request fingerprint, shared by all
//! workers of a request. The lock is held only for lookup, insert and
//! eviction, never across a model call; two workers missing the same key
//! may therefore both compute it, with the second insert winning.

use cloak_core::Entity;
use std::collections::HashMap;
use std::sync::Mutex;
use xxhash_rust::xxh3::xxh3_64;

/// Canonical cache key for one extraction call
///
/// Derived from the unit text, the requested labels, the pass threshold and
/// a digest of the request's schedule/resolution/merge options. Identical
/// requests produce identical fingerprints regardless of call order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    text_hash: u64,
    text_len: usize,
    labels: Vec<String>,
    threshold_bits: u32,
    options_digest: u64,
}

impl Fingerprint {
    /// Compute the fingerprint of one extraction call
    pub fn new(text: &str, labels: &[String], threshold: f32, options_digest: u64) -> Self {
        let mut labels = labels.to_vec();
        labels.sort_unstable();
        Self {
            text_hash: xxh3_64(text.as_bytes()),
            text_len: text.len(),
            labels,
            threshold_bits: threshold.to_bits(),
            options_digest,
        }
    }
}

/// Cumulative cache analytics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the store
    pub hits: u64,
    /// Lookups that fell through to the model
    pub misses: u64,
    /// Entries removed to stay at capacity
    pub evictions: u64,
    /// Current entry count
    pub len: usize,
    /// Configured capacity
    pub capacity: usize,
}

struct CacheEntry {
    entities: Vec<Entity>,
    last_used: u64,
}

#[derive(Default)]
struct CacheState {
    map: HashMap<Fingerprint, CacheEntry>,
    tick: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Bounded LRU store for extraction results
///
/// Safe for concurrent access; all operations are mutually exclusive.
pub struct ExtractionCache {
    state: Mutex<CacheState>,
    capacity: usize,
}

impl ExtractionCache {
    /// Create a cache holding up to `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            capacity: capacity.max(1),
        }
    }

    /// Look up a fingerprint, refreshing its recency on a hit
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<Vec<Entity>> {
        let mut guard = self.lock();
        let state = &mut *guard;
        state.tick += 1;
        match state.map.get_mut(fingerprint) {
            Some(entry) => {
                entry.last_used = state.tick;
                state.hits += 1;
                Some(entry.entities.clone())
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    /// Store a result, evicting the least-recently-used entry at capacity
    pub fn insert(&self, fingerprint: Fingerprint, entities: Vec<Entity>) {
        let mut guard = self.lock();
        let state = &mut *guard;
        state.tick += 1;
        let tick = state.tick;

        if !state.map.contains_key(&fingerprint) && state.map.len() >= self.capacity {
            if let Some(oldest) = state
                .map
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone())
            {
                state.map.remove(&oldest);
                state.evictions += 1;
            }
        }

        state.map.insert(
            fingerprint,
            CacheEntry {
                entities,
                last_used: tick,
            },
        );
    }

    /// Snapshot of the cumulative analytics
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
            len: state.map.len(),
            capacity: self.capacity,
        }
    }

    /// Drop all entries and reset the counters
    pub fn clear(&self) {
        let mut state = self.lock();
        *state = CacheState::default();
    }

    // A panic while the lock is held leaves only per-entry state behind;
    // recovering the guard keeps cache failures non-fatal for the request
    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
