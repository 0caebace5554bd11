//! LRU cache in front of a [`HierarchyLookup`].
//!
//! Hierarchies are read-only for the lifetime of a process, so expansions can
//! be shared across requests. Keys are the sorted, deduplicated input ids.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;

use super::HierarchyLookup;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    InclusiveLocations(Vec<String>),
    CountryCodes(Vec<String>),
    InclusiveJobFunctions(Vec<i64>),
    TitleFunctions(Vec<i64>),
}

#[derive(Debug, Clone)]
enum Cached {
    Strings(Vec<String>),
    Ints(Vec<i64>),
}

/// Hit/miss counters for a [`CachedLookup`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

pub struct CachedLookup<L> {
    inner: L,
    cache: Option<Mutex<LruCache<CacheKey, Cached>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<L: HierarchyLookup> CachedLookup<L> {
    /// Wrap `inner`. A capacity of zero disables caching.
    pub fn new(inner: L, capacity: usize) -> Self {
        Self {
            inner,
            cache: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub const fn inner(&self) -> &L {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.as_ref().map_or(0, |cache| cache.lock().len()),
        }
    }

    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }

    fn get_or_compute(&self, key: CacheKey, compute: impl FnOnce() -> Cached) -> Cached {
        let Some(cache) = &self.cache else {
            return compute();
        };

        if let Some(hit) = cache.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = compute();
        cache.lock().put(key, value.clone());
        value
    }
}

fn string_key(ids: &[String]) -> Vec<String> {
    let mut key = ids.to_vec();
    key.sort();
    key.dedup();
    key
}

fn int_key(ids: &[i64]) -> Vec<i64> {
    let mut key = ids.to_vec();
    key.sort_unstable();
    key.dedup();
    key
}

impl<L: HierarchyLookup> HierarchyLookup for CachedLookup<L> {
    fn inclusive_location_ids(&self, ids: &[String]) -> Vec<String> {
        let key = CacheKey::InclusiveLocations(string_key(ids));
        match self.get_or_compute(key, || Cached::Strings(self.inner.inclusive_location_ids(ids))) {
            Cached::Strings(values) => values,
            Cached::Ints(_) => self.inner.inclusive_location_ids(ids),
        }
    }

    fn location_country_codes(&self, ids: &[String]) -> Vec<String> {
        // Output follows input order, so the key keeps it too.
        let key = CacheKey::CountryCodes(ids.to_vec());
        match self.get_or_compute(key, || Cached::Strings(self.inner.location_country_codes(ids))) {
            Cached::Strings(values) => values,
            Cached::Ints(_) => self.inner.location_country_codes(ids),
        }
    }

    fn inclusive_job_function_ids(&self, ids: &[i64]) -> Vec<i64> {
        let key = CacheKey::InclusiveJobFunctions(int_key(ids));
        match self.get_or_compute(key, || Cached::Ints(self.inner.inclusive_job_function_ids(ids))) {
            Cached::Ints(values) => values,
            Cached::Strings(_) => self.inner.inclusive_job_function_ids(ids),
        }
    }

    fn job_functions_for_titles(&self, title_ids: &[i64]) -> Vec<i64> {
        let key = CacheKey::TitleFunctions(int_key(title_ids));
        match self.get_or_compute(key, || Cached::Ints(self.inner.job_functions_for_titles(title_ids))) {
            Cached::Ints(values) => values,
            Cached::Strings(_) => self.inner.job_functions_for_titles(title_ids),
        }
    }
}
