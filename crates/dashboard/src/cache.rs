use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::metrics;
use crate::Result;

struct CacheEntry<T> {
    value: T,
    fetched_at: Instant,
}

/// Time-bounded single-flight cache for the discovered job list.
///
/// The entry mutex is held across the whole check-TTL / fetch / publish
/// sequence, so concurrent callers against an empty or expired entry produce
/// exactly one underlying fetch and all observe its result. A failed refresh
/// leaves the previous value untouched and propagates the error to the caller
/// that ran the fetch; the next caller retries.
pub struct RefreshCache<T> {
    ttl: Duration,
    entry: Mutex<Option<CacheEntry<T>>>,
}

impl<T: Clone> RefreshCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    pub async fn get_or_refresh<F, Fut>(&self, fetch: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut entry = self.entry.lock().await;

        if let Some(cached) = entry.as_ref() {
            // TTL is measured from the completion of the last successful fetch.
            if cached.fetched_at.elapsed() < self.ttl {
                metrics::CACHE_HITS_TOTAL.inc();
                return Ok(cached.value.clone());
            }
        }

        let value = fetch().await?;
        metrics::CACHE_REFRESHES_TOTAL.inc();
        *entry = Some(CacheEntry {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn fresh_entry_serves_without_fetching() {
        let cache = RefreshCache::new(Duration::from_secs(5));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_refresh(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec!["job-a".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(value, vec!["job-a".to_string()]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_readers_share_a_single_fetch() {
        let cache = Arc::new(RefreshCache::new(Duration::from_secs(5)));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_refresh(|| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        // Keep the refresh in flight long enough for every
                        // reader to queue up behind it.
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(42u64)
                    })
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_triggers_a_refresh() {
        let cache = RefreshCache::new(Duration::from_millis(20));
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(calls.load(Ordering::SeqCst))
        };

        assert_eq!(cache.get_or_refresh(fetch).await.unwrap(), 1);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get_or_refresh(fetch).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_refresh_propagates_and_the_next_call_retries() {
        let cache = RefreshCache::new(Duration::from_secs(5));

        let err = cache
            .get_or_refresh(|| async { Err::<u64, _>(Error::Discovery("all failed".to_string())) })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Discovery(_)));

        // The failure was not published; the next call fetches again.
        let value = cache.get_or_refresh(|| async { Ok(7u64) }).await.unwrap();
        assert_eq!(value, 7);
    }
}
