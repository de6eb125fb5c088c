//! LRU response cache
//!
//! Bounded, TTL-bound cache for finished responses. Lookups refresh
//! recency; once the capacity is exceeded the least recently used entry is
//! evicted. Expired entries are dropped lazily on lookup.
//!
//! Recency is tracked with a tick queue: every access pushes `(key, tick)`
//! and stamps the slot with the same tick. Queue entries whose tick no
//! longer matches their slot are stale and skipped during eviction, so no
//! access ever has to search the queue.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct Slot<V> {
    value: V,
    inserted_at: Instant,
    touched: u64,
}

struct Inner<K, V> {
    map: HashMap<K, Slot<V>>,
    order: VecDeque<(K, u64)>,
    tick: u64,
}

pub struct LruCache<K, V> {
    inner: Mutex<Inner<K, V>>,
    max_entries: usize,
    ttl: Duration,
}

impl<K: Hash + Eq + Clone, V: Clone> LruCache<K, V> {
    #[must_use]
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                order: VecDeque::new(),
                tick: 0,
            }),
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    /// Look up a key. An expired entry is removed and reported as a miss;
    /// a fresh one becomes the most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.lock();

        let expired = match inner.map.get(key) {
            None => return None,
            Some(slot) => slot.inserted_at.elapsed() > self.ttl,
        };
        if expired {
            inner.map.remove(key);
            return None;
        }

        inner.tick += 1;
        let tick = inner.tick;
        let value = inner.map.get_mut(key).map(|slot| {
            slot.touched = tick;
            slot.value.clone()
        })?;
        inner.order.push_back((key.clone(), tick));
        Some(value)
    }

    /// Insert a value, evicting the least recently used entries if the
    /// capacity is exceeded. Re-inserting a key resets its TTL.
    pub fn put(&self, key: K, value: V) {
        let mut inner = self.lock();

        inner.tick += 1;
        let tick = inner.tick;
        inner.order.push_back((key.clone(), tick));
        inner.map.insert(
            key,
            Slot {
                value,
                inserted_at: Instant::now(),
                touched: tick,
            },
        );

        Self::evict(&mut inner, self.max_entries);
        Self::compact(&mut inner);
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict(inner: &mut Inner<K, V>, max_entries: usize) {
        while inner.map.len() > max_entries {
            let Some((key, tick)) = inner.order.pop_front() else {
                break;
            };
            // A mismatched tick is a stale queue entry for a key that was
            // touched again later; the live queue entry is further back.
            if inner.map.get(&key).map(|slot| slot.touched) == Some(tick) {
                inner.map.remove(&key);
            }
        }
    }

    /// Drop stale queue entries once the queue outgrows the map, keeping
    /// queue memory proportional to the entry count.
    fn compact(inner: &mut Inner<K, V>) {
        if inner.order.len() > inner.map.len().saturating_mul(2) + 16 {
            let map = &inner.map;
            inner
                .order
                .retain(|(key, tick)| map.get(key).is_some_and(|slot| slot.touched == *tick));
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(max_entries: usize) -> LruCache<String, String> {
        LruCache::new(max_entries, Duration::from_secs(60))
    }

    #[test]
    fn test_put_get() {
        let cache = cache(4);
        cache.put("a".to_string(), "1".to_string());
        assert_eq!(cache.get(&"a".to_string()), Some("1".to_string()));
        assert_eq!(cache.get(&"b".to_string()), None);
    }

    #[test]
    fn test_overwrite() {
        let cache = cache(4);
        cache.put("a".to_string(), "1".to_string());
        cache.put("a".to_string(), "2".to_string());
        assert_eq!(cache.get(&"a".to_string()), Some("2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = cache(2);
        cache.put("a".to_string(), "1".to_string());
        cache.put("b".to_string(), "2".to_string());

        // Touch "a" so "b" is now the least recently used
        assert!(cache.get(&"a".to_string()).is_some());

        cache.put("c".to_string(), "3".to_string());
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&"a".to_string()).is_some());
        assert!(cache.get(&"b".to_string()).is_none());
        assert!(cache.get(&"c".to_string()).is_some());
    }

    #[test]
    fn test_insertion_order_eviction_without_touches() {
        let cache = cache(2);
        cache.put("a".to_string(), "1".to_string());
        cache.put("b".to_string(), "2".to_string());
        cache.put("c".to_string(), "3".to_string());
        assert!(cache.get(&"a".to_string()).is_none());
        assert!(cache.get(&"b".to_string()).is_some());
        assert!(cache.get(&"c".to_string()).is_some());
    }

    #[test]
    fn test_ttl_expiry() {
        let cache: LruCache<String, String> = LruCache::new(4, Duration::from_millis(20));
        cache.put("a".to_string(), "1".to_string());
        assert!(cache.get(&"a".to_string()).is_some());

        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get(&"a".to_string()).is_none());
    }

    #[test]
    fn test_zero_capacity_clamped_to_one() {
        let cache = cache(0);
        cache.put("a".to_string(), "1".to_string());
        assert_eq!(cache.len(), 1);
        cache.put("b".to_string(), "2".to_string());
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&"b".to_string()).is_some());
    }
}
