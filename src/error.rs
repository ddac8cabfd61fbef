//! Unified error types for transitive-enrich.
//!
//! Lookup failures are rich enough to diagnose a single package; the
//! enrichment driver downgrades all of them to log entries and stats.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for transitive-enrich operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EnrichError {
    /// Errors during enrichment operations
    #[error("Enrichment failed: {context}")]
    Enrichment {
        context: String,
        #[source]
        source: EnrichmentErrorKind,
    },

    /// Errors reading or decoding an inventory document
    #[error("Invalid inventory: {context}")]
    Inventory {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific enrichment error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnrichmentErrorKind {
    /// Transport failure, timeout or cancellation
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Non-200 response from the graph service
    #[error("Remote service returned {status}: {body}")]
    RemoteError { status: u16, body: String },

    /// Response body did not match the dependency graph schema
    #[error("Invalid response format: {0}")]
    DecodeError(String),

    /// A manifest produced no usable packages despite attempted lookups
    #[error("No dependencies resolved for {0}")]
    NoDependenciesResolved(String),

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

/// Network error message for a cancelled lookup
pub const CANCELLED: &str = "cancelled";

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for transitive-enrich operations
pub type Result<T> = std::result::Result<T, EnrichError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl EnrichError {
    /// Create an enrichment error
    pub fn enrichment(context: impl Into<String>, source: EnrichmentErrorKind) -> Self {
        Self::Enrichment {
            context: context.into(),
            source,
        }
    }

    /// Create a network error
    pub fn network(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::enrichment(context, EnrichmentErrorKind::NetworkError(message.into()))
    }

    /// Create the network error reported when a lookup is cancelled
    pub fn cancelled(context: impl Into<String>) -> Self {
        Self::network(context, CANCELLED)
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The enrichment kind, if this is an enrichment error.
    #[must_use]
    pub const fn enrichment_kind(&self) -> Option<&EnrichmentErrorKind> {
        match self {
            Self::Enrichment { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Whether this error is a transport-level failure (including cancellation).
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self.enrichment_kind(),
            Some(EnrichmentErrorKind::NetworkError(_))
        )
    }

    /// Whether this error reports a cancelled lookup rather than a real failure.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self.enrichment_kind(),
            Some(EnrichmentErrorKind::NetworkError(msg)) if msg == CANCELLED
        )
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for EnrichError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for EnrichError {
    fn from(err: serde_json::Error) -> Self {
        Self::Inventory {
            context: "JSON deserialization".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The new context is prepended to any existing context, so a chain like
/// `"loading inventory: JSON deserialization"` shows the path through the code.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<EnrichError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: EnrichError, new_ctx: &str) -> EnrichError {
    match err {
        EnrichError::Enrichment {
            context: existing,
            source,
        } => EnrichError::Enrichment {
            context: chain_context(new_ctx, &existing),
            source,
        },
        EnrichError::Inventory {
            context: existing,
            source,
        } => EnrichError::Inventory {
            context: chain_context(new_ctx, &existing),
            source,
        },
        EnrichError::Io {
            path,
            message,
            source,
        } => EnrichError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        EnrichError::Config(msg) => EnrichError::Config(chain_context(new_ctx, &msg)),
        EnrichError::Validation(msg) => EnrichError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display_carries_status_and_body() {
        let err = EnrichError::enrichment(
            "fetching pypi/requests@2.31.0",
            EnrichmentErrorKind::RemoteError {
                status: 404,
                body: "not found".to_string(),
            },
        );
        let source = err.enrichment_kind().unwrap().to_string();
        assert!(source.contains("404"));
        assert!(source.contains("not found"));
        assert!(err.to_string().contains("pypi/requests@2.31.0"));
    }

    #[test]
    fn test_is_network() {
        assert!(EnrichError::network("fetch", "connection refused").is_network());
        assert!(!EnrichError::validation("empty version").is_network());
    }

    #[test]
    fn test_is_cancelled_survives_context() {
        let err: Result<()> = Err(EnrichError::cancelled("fetching pypi/requests@2.31.0"));
        let err = err.context("resolving requirements.txt").unwrap_err();
        assert!(err.is_cancelled());
        assert!(err.is_network());

        assert!(!EnrichError::network("fetch", "connection refused").is_cancelled());
        let no_deps = EnrichError::enrichment(
            "resolving requirements.txt",
            EnrichmentErrorKind::NoDependenciesResolved("requirements.txt".into()),
        );
        assert!(!no_deps.is_cancelled());
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = EnrichError::io("/path/to/inventory.json", io_err);

        assert!(err.to_string().contains("/path/to/inventory.json"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(EnrichError::network("base", "timeout"))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(EnrichError::Enrichment { context, source }) => {
                assert_eq!(context, "outer layer: middle layer: base");
                assert_eq!(source, EnrichmentErrorKind::NetworkError("timeout".into()));
            }
            other => panic!("Expected Enrichment error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(EnrichError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
