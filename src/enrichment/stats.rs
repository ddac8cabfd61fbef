//! Enrichment statistics and error records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Statistics from an enrichment operation.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EnrichmentStats {
    /// Number of manifest groups considered
    pub manifests_seen: usize,
    /// Number of manifest groups that were skipped because of a failure
    pub manifests_failed: usize,
    /// Number of pinned direct packages looked up
    pub packages_queried: usize,
    /// Number of unpinned direct packages that could not be looked up
    pub packages_unpinned: usize,
    /// Number of lookups that failed
    pub lookups_failed: usize,
    /// Number of existing inventory entries updated in place
    pub packages_updated: usize,
    /// Number of new inventory entries appended
    pub packages_added: usize,
    /// Number of cache hits (avoided API calls)
    pub cache_hits: usize,
    /// Number of API calls made
    pub api_calls: usize,
    /// Duration of the enrichment operation
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Errors encountered during enrichment
    pub errors: Vec<EnrichmentError>,
}

impl EnrichmentStats {
    /// Create new empty stats
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty stats (alias for default, for clarity in null object pattern)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total number of direct packages checked (queried + unpinned)
    #[must_use]
    pub const fn packages_checked(&self) -> usize {
        self.packages_queried + self.packages_unpinned
    }

    /// Log a summary of the enrichment operation
    pub fn log_summary(&self, enricher: &str) {
        tracing::info!(
            "{}: {} manifests ({} failed), {} packages queried, {} unpinned, \
             {} updated, {} added, {} cache hits, {} API calls in {:?}",
            enricher,
            self.manifests_seen,
            self.manifests_failed,
            self.packages_queried,
            self.packages_unpinned,
            self.packages_updated,
            self.packages_added,
            self.cache_hits,
            self.api_calls,
            self.duration
        );

        for err in &self.errors {
            tracing::warn!("{}: {}", enricher, err);
        }
    }

    /// Check if there were any errors
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Merge stats from another enrichment operation
    pub fn merge(&mut self, other: &Self) {
        self.manifests_seen += other.manifests_seen;
        self.manifests_failed += other.manifests_failed;
        self.packages_queried += other.packages_queried;
        self.packages_unpinned += other.packages_unpinned;
        self.lookups_failed += other.lookups_failed;
        self.packages_updated += other.packages_updated;
        self.packages_added += other.packages_added;
        self.cache_hits += other.cache_hits;
        self.api_calls += other.api_calls;
        self.duration += other.duration;
        self.errors.extend(other.errors.iter().cloned());
    }
}

/// Errors recorded during enrichment.
///
/// These are reporting records; none of them abort an enrichment pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrichmentError {
    /// A single package lookup failed
    LookupFailed {
        package: String,
        version: String,
        reason: String,
    },
    /// A manifest group produced nothing usable
    ManifestFailed { path: String, reason: String },
    /// The pass was cancelled before this manifest completed
    Cancelled { path: String },
    /// The enricher was skipped entirely
    Skipped(String),
}

impl fmt::Display for EnrichmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LookupFailed {
                package,
                version,
                reason,
            } => write!(f, "lookup failed for {package}@{version}: {reason}"),
            Self::ManifestFailed { path, reason } => {
                write!(f, "resolution failed for {path}: {reason}")
            }
            Self::Cancelled { path } => write!(f, "cancelled while resolving {path}"),
            Self::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

impl std::error::Error for EnrichmentError {}

/// Serde support for Duration
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
