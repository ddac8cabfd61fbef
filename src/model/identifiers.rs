//! Ecosystem identifiers and package-URL types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Package-URL type for Python packages
pub const PURL_TYPE_PYPI: &str = "pypi";
/// Package-URL type for Maven artifacts
pub const PURL_TYPE_MAVEN: &str = "maven";

/// Ecosystem/package manager type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ecosystem {
    PyPi,
    Maven,
    Npm,
    Cargo,
    Golang,
    Nuget,
    Unknown(String),
}

impl Ecosystem {
    /// Parse ecosystem from PURL type
    #[must_use]
    pub fn from_purl_type(purl_type: &str) -> Self {
        match purl_type.to_lowercase().as_str() {
            "pypi" => Self::PyPi,
            "maven" => Self::Maven,
            "npm" => Self::Npm,
            "cargo" => Self::Cargo,
            "golang" | "go" => Self::Golang,
            "nuget" => Self::Nuget,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// System segment used by the deps.dev API for this ecosystem.
    #[must_use]
    pub fn depsdev_system(&self) -> &str {
        match self {
            Self::PyPi => "pypi",
            Self::Maven => "maven",
            Self::Npm => "npm",
            Self::Cargo => "cargo",
            Self::Golang => "go",
            Self::Nuget => "nuget",
            Self::Unknown(s) => s,
        }
    }

    /// Whether package names compare case-insensitively in this ecosystem.
    #[must_use]
    pub const fn is_case_insensitive(&self) -> bool {
        matches!(self, Self::PyPi | Self::Nuget)
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PyPi => write!(f, "pypi"),
            Self::Maven => write!(f, "maven"),
            Self::Npm => write!(f, "npm"),
            Self::Cargo => write!(f, "cargo"),
            Self::Golang => write!(f, "golang"),
            Self::Nuget => write!(f, "nuget"),
            Self::Unknown(s) => write!(f, "{s}"),
        }
    }
}
