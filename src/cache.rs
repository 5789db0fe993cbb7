//! Short-lived result cache in front of the quoter.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use tracing::debug;

use crate::domain::{QuoteRequest, TradeResult};
use crate::quoter::Quoter;

/// How long any result, including not-found and error results, is reused.
pub const QUOTE_CACHE_TTL: Duration = Duration::from_secs(10);

/// Distinct requests kept before the least recently used one is evicted.
pub const QUOTE_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

pub struct ResultCache {
    entries: Mutex<LruCache<QuoteRequest, (TradeResult, Instant)>>,
    max_age: Duration,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

/// Snapshot of cache hit/miss counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetrics {
    pub hits: usize,
    pub misses: usize,
}

impl ResultCache {
    pub fn new(max_age: Duration) -> Self {
        Self::with_capacity(max_age, QUOTE_CACHE_CAPACITY)
    }

    pub fn with_capacity(max_age: Duration, capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            max_age,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Fresh result for `req`, if any. An expired entry is dropped on lookup.
    pub fn get(&self, req: &QuoteRequest) -> Option<TradeResult> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let expired = matches!(entries.peek(req), Some((_, at)) if at.elapsed() >= self.max_age);
        if expired {
            entries.pop(req);
        }

        match entries.get(req) {
            Some((result, _)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(result.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, req: QuoteRequest, result: TradeResult) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.put(req, (result, Instant::now()));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn metrics(&self) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(QUOTE_CACHE_TTL)
    }
}

/// [`Quoter`] whose results are reused for [`QUOTE_CACHE_TTL`]. Concurrent
/// misses for the same request are not coalesced.
pub struct CachedQuoter {
    quoter: Quoter,
    cache: ResultCache,
}

impl CachedQuoter {
    pub fn new(quoter: Quoter) -> Self {
        Self::with_cache(quoter, ResultCache::default())
    }

    pub fn with_cache(quoter: Quoter, cache: ResultCache) -> Self {
        Self { quoter, cache }
    }

    pub async fn get_quote(&self, req: &QuoteRequest) -> TradeResult {
        if let Some(result) = self.cache.get(req) {
            debug!(chain_id = req.token_in_chain_id, "quoter.cache.hit");
            return result;
        }
        let result = self.quoter.get_quote(req).await;
        self.cache.insert(req.clone(), result.clone());
        result
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}
