//! Error types for the virt-profiles merge engine and service.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A single field-level disagreement: two non-absent, unequal values proposed
/// for the same field path.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{path}: {incoming} != {existing}")]
pub struct Conflict {
    /// Recognized field path, e.g. `spec.firmware`.
    pub path: &'static str,
    /// Value proposed by the preset under inspection.
    pub incoming: String,
    /// Value already present on the other side.
    pub existing: String,
}

impl Conflict {
    pub fn new(path: &'static str, incoming: impl fmt::Debug, existing: impl fmt::Debug) -> Self {
        Self {
            path,
            incoming: format!("{:?}", incoming),
            existing: format!("{:?}", existing),
        }
    }
}

/// Every field conflict found between one pair of specs. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflicts(pub Vec<Conflict>);

impl Conflicts {
    /// Field paths in conflict, in discovery order.
    pub fn paths(&self) -> Vec<&'static str> {
        self.0.iter().map(|c| c.path).collect()
    }
}

impl fmt::Display for Conflicts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, conflict) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", conflict)?;
        }
        write!(f, "]")
    }
}

impl std::error::Error for Conflicts {}

/// All conflicts between one pair of presets, tagged with both names.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("presets '{first}' and '{second}' conflict: {conflicts}")]
pub struct PresetConflict {
    pub first: String,
    pub second: String,
    pub conflicts: Conflicts,
}

/// Aggregate over every conflicting preset pair. All pairwise failures are
/// reported together, never just the first.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetConflicts(pub Vec<PresetConflict>);

impl fmt::Display for PresetConflicts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, conflict) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", conflict)?;
        }
        Ok(())
    }
}

impl std::error::Error for PresetConflicts {}

/// Fatal merge failures. Non-fatal conditions travel in the warnings list of
/// a [`crate::types::MergeOutcome`] instead.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("domain spec cannot be cloned: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("presets cannot be applied due to conflicts: {0}")]
    Conflicts(#[from] PresetConflicts),
}

/// Recoverable sorting failure: callers fall back to the submitted preset
/// order and record this as a warning.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("presets cannot be sorted, they lack a priority tag: {}", .missing.join(", "))]
pub struct SortError {
    /// Names of every preset without a priority.
    pub missing: Vec<String>,
}

/// Profile catalogue failures.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("profiles directory not found: {0}")]
    NotADirectory(PathBuf),

    #[error("profile not found: {0}")]
    NotFound(String),

    #[error("invalid profile name: {0:?}")]
    InvalidName(String),

    #[error("profile '{name}' cannot be parsed: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("profile cannot be encoded: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("catalogue I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Service startup failures: configuration, logging, listener setup.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),
}
