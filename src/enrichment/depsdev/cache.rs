//! In-memory cache of fetched dependency graphs.

use super::response::DependencyGraph;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cache key for graph lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey {
    /// deps.dev system (pypi, maven, ...)
    pub system: String,
    pub name: String,
    pub version: String,
}

impl CacheKey {
    /// Create a cache key for one lookup.
    pub fn new(
        system: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            system: system.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.system, self.name, self.version)
    }
}

/// Process-wide graph cache.
///
/// Entries are never evicted. Lookups and inserts each take the lock
/// separately, so two concurrent misses for one key both fetch; the first
/// insert wins and later inserts return the stored graph.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: Mutex<HashMap<CacheKey, Arc<DependencyGraph>>>,
}

impl ResolutionCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache ready to be shared between clients
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<DependencyGraph>>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a cached graph.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Arc<DependencyGraph>> {
        self.lock().get(key).cloned()
    }

    /// Store a graph, returning the graph now held for `key`.
    pub fn insert(&self, key: CacheKey, graph: DependencyGraph) -> Arc<DependencyGraph> {
        Arc::clone(self.lock().entry(key).or_insert_with(|| Arc::new(graph)))
    }

    /// Number of cached graphs
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
