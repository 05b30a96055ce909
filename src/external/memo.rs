//! Single-flight memoization for external lookups.
//!
//! Each key gets its own `OnceCell`; the first caller runs the lookup and
//! concurrent callers for the same key block on the cell instead of
//! repeating it. Negative results are cached too.

use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use super::{ExternalClasslikeProvider, ExternalLocationProvider};
use crate::model::{Classlike, Sid, SourceSetId};

/// Per-key once-only cache.
pub struct SingleFlightCache<V> {
    cells: RwLock<HashMap<Sid, Arc<OnceCell<V>>>>,
    lookups: AtomicUsize,
    requests: AtomicUsize,
}

impl<V: Clone> SingleFlightCache<V> {
    pub fn new() -> Self {
        Self {
            cells: RwLock::new(HashMap::new()),
            lookups: AtomicUsize::new(0),
            requests: AtomicUsize::new(0),
        }
    }

    fn cell(&self, key: &Sid) -> Arc<OnceCell<V>> {
        if let Ok(cells) = self.cells.read() {
            if let Some(cell) = cells.get(key) {
                return Arc::clone(cell);
            }
        }
        match self.cells.write() {
            Ok(mut cells) => Arc::clone(cells.entry(key.clone()).or_default()),
            // A poisoned map still yields a correct (unshared) cell.
            Err(_) => Arc::new(OnceCell::new()),
        }
    }

    /// Cached value for `key`, computing it with `lookup` at most once.
    pub fn get_or_compute<F>(&self, key: &Sid, lookup: F) -> V
    where
        F: FnOnce() -> V,
    {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let cell = self.cell(key);
        cell.get_or_init(|| {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            lookup()
        })
        .clone()
    }

    /// (hits, lookups performed).
    pub fn stats(&self) -> (usize, usize) {
        let lookups = self.lookups.load(Ordering::Relaxed);
        let requests = self.requests.load(Ordering::Relaxed);
        (requests.saturating_sub(lookups), lookups)
    }
}

impl<V: Clone> Default for SingleFlightCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A class-like found outside the documented corpus, and the source set
/// whose context produced it.
#[derive(Debug, Clone)]
pub struct ExternalHit {
    pub classlike: Arc<Classlike>,
    pub source_set: SourceSetId,
}

/// Tries every source set in order and remembers the outcome per SID.
pub struct MemoizedClasslikeProvider {
    inner: Arc<dyn ExternalClasslikeProvider>,
    source_sets: Vec<SourceSetId>,
    cache: SingleFlightCache<Option<ExternalHit>>,
}

impl MemoizedClasslikeProvider {
    pub fn new(inner: Arc<dyn ExternalClasslikeProvider>, source_sets: Vec<SourceSetId>) -> Self {
        Self {
            inner,
            source_sets,
            cache: SingleFlightCache::new(),
        }
    }

    pub fn lookup(&self, sid: &Sid) -> Option<ExternalHit> {
        self.cache.get_or_compute(sid, || {
            let hit = self.source_sets.iter().find_map(|set| {
                self.inner.classlike(sid, set).map(|classlike| ExternalHit {
                    classlike,
                    source_set: set.clone(),
                })
            });
            tracing::debug!(%sid, found = hit.is_some(), "External class-like lookup");
            hit
        })
    }

    pub fn stats(&self) -> (usize, usize) {
        self.cache.stats()
    }
}

/// Memoized external location oracle.
pub struct MemoizedLocationProvider {
    inner: Arc<dyn ExternalLocationProvider>,
    cache: SingleFlightCache<Option<String>>,
}

impl MemoizedLocationProvider {
    pub fn new(inner: Arc<dyn ExternalLocationProvider>) -> Self {
        Self {
            inner,
            cache: SingleFlightCache::new(),
        }
    }

    pub fn resolve(&self, sid: &Sid) -> Option<String> {
        self.cache.get_or_compute(sid, || self.inner.resolve(sid))
    }

    pub fn stats(&self) -> (usize, usize) {
        self.cache.stats()
    }
}
