use crate::core::timeseries::TimeSeries;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    fetched_at: Instant,
    series: TimeSeries,
}

/// Short-lived in-memory cache for fetched series, keyed by
/// (indicator, window). Concurrent requests for the same key collapse to a
/// single upstream fetch: each key owns an async mutex that is held across
/// the fetch, so late arrivals wait and then read the fresh entry.
///
/// Note an upstream failure caches as an empty series for the TTL — same
/// behavior for callers, and it keeps a flapping source from being hammered.
pub struct SeriesCache<K> {
    ttl: Duration,
    entries: Mutex<HashMap<K, Arc<Mutex<Option<CacheEntry>>>>>,
}

impl<K: Eq + Hash + Clone> SeriesCache<K> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }

    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> TimeSeries
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = TimeSeries>,
    {
        // 1. Grab (or create) the per-key slot. The outer map lock is only
        // held long enough to clone the Arc.
        let slot = {
            let mut entries = self.entries.lock().await;
            entries.entry(key).or_insert_with(|| Arc::new(Mutex::new(None))).clone()
        };

        // 2. Per-key critical section: fresh entry wins, otherwise fetch
        // while holding the slot so concurrent callers wait instead of
        // issuing duplicate upstream requests.
        let mut guard = slot.lock().await;
        if let Some(entry) = guard.as_ref() {
            if entry.fetched_at.elapsed() < self.ttl {
                return entry.series.clone();
            }
        }

        let series = fetch().await;
        *guard = Some(CacheEntry { fetched_at: Instant::now(), series: series.clone() });
        series
    }
}

impl<K: Eq + Hash + Clone> Default for SeriesCache<K> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataPoint;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_series() -> TimeSeries {
        TimeSeries::from_points(vec![DataPoint {
            timestamp: chrono::Utc::now(),
            value: 1.0,
        }])
    }

    #[tokio::test]
    async fn test_second_lookup_hits_cache() {
        let cache: SeriesCache<&str> = SeriesCache::default();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let series = cache
                .get_or_fetch("cpi", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    sample_series()
                })
                .await;
            assert_eq!(series.len(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let cache: SeriesCache<&str> = SeriesCache::new(Duration::ZERO);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .get_or_fetch("cpi", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    sample_series()
                })
                .await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_collapse() {
        let cache = Arc::new(SeriesCache::<&str>::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch("btc", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        sample_series()
                    })
                    .await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().len(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache: SeriesCache<(&str, Option<i64>)> = SeriesCache::default();
        let calls = AtomicUsize::new(0);

        cache.get_or_fetch(("cpi", Some(365)), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            sample_series()
        }).await;
        cache.get_or_fetch(("cpi", None), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            sample_series()
        }).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
