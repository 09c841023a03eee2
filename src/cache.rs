use crate::api::models::MatchRecord;
use crate::api::MatchSource;
use crate::error::FetchError;
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
struct CachedFetch {
    records: Vec<MatchRecord>,
    fetched_at: DateTime<Utc>,
}

impl CachedFetch {
    fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match now.signed_duration_since(self.fetched_at).to_std() {
            Ok(age) => age >= ttl,
            // fetched_at is in the future (clock went backwards); treat as stale
            Err(_) => true,
        }
    }
}

/// Time-bounded cache in front of a `MatchSource`, keyed by the exact
/// tournament path. Stale entries are evicted lazily when read. Failed
/// fetches are never cached.
pub struct FetchCache<S> {
    source: S,
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedFetch>>,
}

impl<S: MatchSource> FetchCache<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        FetchCache {
            source,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The wrapped source, for callers that must bypass the cache.
    pub fn inner(&self) -> &S {
        &self.source
    }

    pub fn fetch_at(&self, tournament_path: &str, now: DateTime<Utc>) -> Result<Vec<MatchRecord>, FetchError> {
        // The lock is held across the fetch so concurrent calls for the same
        // path collapse into a single request.
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(entry) = entries.get(tournament_path) {
            if !entry.is_stale(now, self.ttl) {
                debug!("Cache hit for {}", tournament_path);
                return Ok(entry.records.clone());
            }
            debug!("Cache entry for {} expired", tournament_path);
            entries.remove(tournament_path);
        }

        let records = self.source.fetch(tournament_path)?;
        entries.insert(
            tournament_path.to_string(),
            CachedFetch {
                records: records.clone(),
                fetched_at: now,
            },
        );
        Ok(records)
    }
}

impl<S: MatchSource> MatchSource for FetchCache<S> {
    fn fetch(&self, tournament_path: &str) -> Result<Vec<MatchRecord>, FetchError> {
        self.fetch_at(tournament_path, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    struct CountingSource {
        calls: Cell<usize>,
        fail: bool,
    }

    impl CountingSource {
        fn new() -> Self {
            CountingSource { calls: Cell::new(0), fail: false }
        }
    }

    impl MatchSource for CountingSource {
        fn fetch(&self, tournament_path: &str) -> Result<Vec<MatchRecord>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(FetchError::Http("connection reset".to_string()));
            }
            Ok(vec![json!({"path": tournament_path, "call": self.calls.get()})])
        }
    }

    /// Slow enough that a second caller arrives while the first is in flight.
    struct SlowSource {
        calls: AtomicUsize,
    }

    impl MatchSource for SlowSource {
        fn fetch(&self, tournament_path: &str) -> Result<Vec<MatchRecord>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(50));
            Ok(vec![json!({"path": tournament_path})])
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn cached_paths<S>(cache: &FetchCache<S>) -> usize {
        cache.entries.lock().unwrap().len()
    }

    #[test]
    fn repeated_fetch_within_window_hits_cache() {
        let cache = FetchCache::new(CountingSource::new(), Duration::from_secs(3600));

        let first = cache.fetch_at("MSC/2024", at(0)).unwrap();
        let second = cache.fetch_at("MSC/2024", at(3599)).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.inner().calls.get(), 1);
    }

    #[test]
    fn expired_entry_is_refetched() {
        let cache = FetchCache::new(CountingSource::new(), Duration::from_secs(3600));

        cache.fetch_at("MSC/2024", at(0)).unwrap();
        let refreshed = cache.fetch_at("MSC/2024", at(3600)).unwrap();

        assert_eq!(cache.inner().calls.get(), 2);
        assert_eq!(refreshed[0]["call"], 2);
        assert_eq!(cached_paths(&cache), 1);
    }

    #[test]
    fn keys_are_exact_paths() {
        let cache = FetchCache::new(CountingSource::new(), Duration::from_secs(3600));

        cache.fetch_at("MPL/Indonesia/Season_16", at(0)).unwrap();
        cache.fetch_at("MPL/Philippines/Season_16", at(1)).unwrap();
        cache.fetch_at("MPL/Indonesia/Season_16", at(2)).unwrap();

        assert_eq!(cache.inner().calls.get(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let source = CountingSource { calls: Cell::new(0), fail: true };
        let cache = FetchCache::new(source, Duration::from_secs(3600));

        assert!(cache.fetch_at("MSC/2024", at(0)).is_err());
        assert!(cache.fetch_at("MSC/2024", at(1)).is_err());

        assert_eq!(cache.inner().calls.get(), 2);
        assert_eq!(cached_paths(&cache), 0);
    }

    #[test]
    fn concurrent_fetches_of_one_path_share_a_request() {
        let cache = FetchCache::new(SlowSource { calls: AtomicUsize::new(0) }, Duration::from_secs(3600));

        let (first, second) = thread::scope(|scope| {
            let a = scope.spawn(|| cache.fetch_at("MSC/2024", at(0)));
            let b = scope.spawn(|| cache.fetch_at("MSC/2024", at(0)));
            (a.join().unwrap(), b.join().unwrap())
        });

        assert_eq!(first.unwrap(), second.unwrap());
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached_paths(&cache), 1);
    }
}
