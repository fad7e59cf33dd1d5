//! Per travel mode projection cache with usage counters.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::engine::{Coordinate, ProjectedLocation, TravelMode};

/// Snapshot of a cache's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub calls: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: usize,
}

#[derive(Debug)]
struct CacheState {
    /// `None` for a zero capacity, which stores nothing.
    entries: Option<LruCache<Coordinate, Arc<ProjectedLocation>>>,
    calls: u64,
    misses: u64,
}

/// Bounded LRU cache of projections for one travel mode.
///
/// Lookups, insertions and counter updates happen under a single lock.
/// The engine call on a miss runs outside of it, so concurrent workers do
/// not serialize on slow projections.
#[derive(Debug)]
pub struct ProjectionCache {
    travel_mode: TravelMode,
    state: Mutex<CacheState>,
}

impl ProjectionCache {
    pub fn new(travel_mode: TravelMode, capacity: usize) -> Self {
        Self {
            travel_mode,
            state: Mutex::new(CacheState {
                entries: NonZeroUsize::new(capacity).map(LruCache::new),
                calls: 0,
                misses: 0,
            }),
        }
    }

    pub fn travel_mode(&self) -> TravelMode {
        self.travel_mode
    }

    /// Return the cached projection of `coordinate`, computing and storing it
    /// with `project` on a miss.
    ///
    /// Failed projections count as misses and are not stored.
    pub fn get_or_project<F>(&self, coordinate: Coordinate, project: F) -> Option<Arc<ProjectedLocation>>
    where
        F: FnOnce() -> Option<ProjectedLocation>,
    {
        {
            let mut state = self.state.lock();
            state.calls += 1;
            if let Some(hit) = state.entries.as_mut().and_then(|entries| entries.get(&coordinate)) {
                return Some(Arc::clone(hit));
            }
            state.misses += 1;
        }

        let projected = Arc::new(project()?);
        let evicted = match self.state.lock().entries.as_mut() {
            Some(entries) => entries.push(coordinate, Arc::clone(&projected)),
            None => None,
        };
        // push hands back the old value when another worker stored the key first
        if let Some((evicted, _)) = evicted.filter(|(key, _)| *key != coordinate) {
            tracing::trace!(travel_mode = ?self.travel_mode, coordinate = %evicted, "Projection evicted");
        }
        Some(projected)
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            calls: state.calls,
            misses: state.misses,
            size: state.entries.as_ref().map_or(0, LruCache::len),
            capacity: state.entries.as_ref().map_or(0, |entries| entries.cap().get()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn snapped(c: Coordinate) -> Option<ProjectedLocation> {
        Some(ProjectedLocation {
            input: c,
            snapped: c,
            edges: Vec::new(),
        })
    }

    #[test]
    fn repeated_lookup_is_a_hit() {
        let cache = ProjectionCache::new(TravelMode::Pedestrian, 10);
        let engine_calls = AtomicUsize::new(0);
        let c = Coordinate::new(2.0, 48.0);

        for _ in 0..3 {
            let projected = cache.get_or_project(c, || {
                engine_calls.fetch_add(1, Ordering::SeqCst);
                snapped(c)
            });
            assert_eq!(projected.unwrap().snapped, c);
        }

        assert_eq!(engine_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            cache.stats(),
            CacheStats { calls: 3, misses: 1, size: 1, capacity: 10 }
        );
    }

    #[test]
    fn failed_projection_is_not_cached() {
        let cache = ProjectionCache::new(TravelMode::Drive, 10);
        let c = Coordinate::new(0.0, 0.0);
        assert!(cache.get_or_project(c, || None).is_none());
        assert!(cache.get_or_project(c, || None).is_none());

        let stats = cache.stats();
        assert_eq!((stats.calls, stats.misses, stats.size), (2, 2, 0));
    }

    #[test]
    fn size_never_exceeds_capacity_across_threads() {
        let cache = Arc::new(ProjectionCache::new(TravelMode::Bicycle, 16));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..500 {
                        let c = Coordinate::new(f64::from((i * 7 + t) % 64), 1.0);
                        cache.get_or_project(c, || snapped(c));
                        assert!(cache.stats().size <= 16);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.calls, 2_000);
        assert!(stats.misses <= stats.calls);
        assert_eq!(stats.size, 16);
    }

    #[test]
    fn evicts_the_least_recently_used_projection() {
        let cache = ProjectionCache::new(TravelMode::Pedestrian, 2);
        let (a, b, c) = (Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0), Coordinate::new(3.0, 3.0));
        cache.get_or_project(a, || snapped(a));
        cache.get_or_project(b, || snapped(b));
        // a becomes the most recent, so c pushes b out
        cache.get_or_project(a, || panic!("a should be cached"));
        cache.get_or_project(c, || snapped(c));

        let engine_calls = AtomicUsize::new(0);
        cache.get_or_project(a, || {
            engine_calls.fetch_add(1, Ordering::SeqCst);
            snapped(a)
        });
        assert_eq!(engine_calls.load(Ordering::SeqCst), 0);
        cache.get_or_project(b, || {
            engine_calls.fetch_add(1, Ordering::SeqCst);
            snapped(b)
        });
        assert_eq!(engine_calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().size, 2);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = ProjectionCache::new(TravelMode::Drive, 0);
        let c = Coordinate::new(5.0, 45.0);
        assert!(cache.get_or_project(c, || snapped(c)).is_some());
        assert!(cache.get_or_project(c, || snapped(c)).is_some());
        assert_eq!(
            cache.stats(),
            CacheStats { calls: 2, misses: 2, size: 0, capacity: 0 }
        );
    }
}
