use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;

use super::Parse;

/// Upper bound on the number of independently locked shards.
const MAX_SHARDS: usize = 16;
/// Capacities below `MIN_PER_SHARD * shards` use fewer shards, so small
/// caches keep exact LRU order.
const MIN_PER_SHARD: usize = 64;

type Shard = Mutex<LruCache<String, Arc<[Parse]>>>;

/// Bounded memo of ranked parses keyed by normalised word.
///
/// Words are spread over independently locked LRU shards by hash, so
/// concurrent parses of different words rarely touch the same lock. Values
/// are inserted as complete `Arc<[Parse]>` slices under the shard lock, so
/// a concurrent reader sees either nothing or the whole result.
#[derive(Debug)]
pub(crate) struct ParseCache {
    shards: Vec<Shard>,
    hasher: RandomState,
}

impl ParseCache {
    /// A capacity of 0 disables caching. The total capacity is split
    /// across shards, each holding at least one entry.
    pub fn new(capacity: usize) -> Self {
        let count = (capacity / MIN_PER_SHARD).clamp(1, MAX_SHARDS);
        let shards = if capacity == 0 {
            Vec::new()
        } else {
            (0..count)
                .filter_map(|i| {
                    let share = capacity / count + usize::from(i < capacity % count);
                    NonZeroUsize::new(share).map(|cap| Mutex::new(LruCache::new(cap)))
                })
                .collect()
        };
        Self {
            shards,
            hasher: RandomState::new(),
        }
    }

    fn shard(&self, word: &str) -> Option<&Shard> {
        if self.shards.is_empty() {
            return None;
        }
        let i = self.hasher.hash_one(word) as usize % self.shards.len();
        self.shards.get(i)
    }

    pub fn get(&self, word: &str) -> Option<Arc<[Parse]>> {
        // A poisoned lock only means another parse panicked; treat as a miss.
        let mut cache = self.shard(word)?.lock().ok()?;
        cache.get(word).cloned()
    }

    pub fn put(&self, word: String, parses: Arc<[Parse]>) {
        if let Some(mut cache) = self.shard(&word).and_then(|m| m.lock().ok()) {
            cache.put(word, parses);
        }
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .filter_map(|m| m.lock().ok().map(|cache| cache.len()))
            .sum()
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            if let Ok(mut cache) = shard.lock() {
                cache.clear();
            }
        }
    }

    #[cfg(test)]
    fn shard_count(&self) -> usize {
        self.shards.len()
    }
}
