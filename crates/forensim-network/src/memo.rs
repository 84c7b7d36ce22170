//! Bounded memoisation of recomputation results keyed by parameters.
//!
//! Recomputation is a pure function of (dataset, params), so for a fixed
//! dataset a cached result is always valid. The least recently used entry
//! is evicted first.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use crate::pipeline::{SimilarityParams, SimilarityResult};

pub struct MemoCache {
    cache: LruCache<SimilarityParams, Arc<SimilarityResult>>,
}

impl MemoCache {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Look up a result and mark it as recently used.
    pub fn get(&mut self, params: &SimilarityParams) -> Option<Arc<SimilarityResult>> {
        self.cache.get(params).cloned()
    }

    pub fn insert(&mut self, params: SimilarityParams, result: Arc<SimilarityResult>) {
        self.cache.put(params, result);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
