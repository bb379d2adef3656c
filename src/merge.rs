//! Preset merge engine.
//!
//! Composition: clone the base spec, order the presets by priority, check
//! every preset pair for conflicts, then merge each preset into the running
//! clone under per-field policies. The caller's spec is never mutated; the
//! engine holds no state across calls.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MergeError;
use crate::types::{DomainSpec, MergeOutcome, Preset};

mod apply;
mod clone;
mod conflict;
mod sort;

pub use apply::merge_domain_spec;
pub use clone::clone_domain_spec;
pub use conflict::{check_against_base, check_conflicts, check_preset_conflicts};
pub use sort::sort_presets;

/// What to do when presets disagree with each other.
///
/// `Warn` records the pairwise aggregate as a warning and merges anyway, the
/// earlier preset winning under first-wins policies. `Fail` aborts the merge
/// with [`MergeError::Conflicts`] and no merged result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    #[default]
    Warn,
    Fail,
}

/// Applies preset collections to domain specifications.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    conflict_policy: ConflictPolicy,
    skip_sorting: bool,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    pub fn with_sorting(mut self, enabled: bool) -> Self {
        self.skip_sorting = !enabled;
        self
    }

    /// Apply all the given presets to the domain specification.
    ///
    /// Returns a merged copy plus the warnings accumulated along the way.
    /// Sorting failures and partial applications are warnings; a failed
    /// clone, or pairwise conflicts under [`ConflictPolicy::Fail`], abort
    /// the merge.
    pub fn apply_presets(
        &self,
        base: &DomainSpec,
        presets: &[Preset],
    ) -> Result<MergeOutcome, MergeError> {
        let mut warnings = Vec::new();
        let mut merged = clone_domain_spec(base)?;

        let ordered: Vec<&Preset> = if self.skip_sorting {
            presets.iter().collect()
        } else {
            match sort_presets(presets) {
                Ok(ordered) => ordered,
                Err(err) => {
                    // sorting errors are not critical for this flow
                    warn!(%err, "preset sorting failed, keeping submitted order");
                    warnings.push(err.to_string());
                    presets.iter().collect()
                }
            }
        };

        if let Err(conflicts) = check_preset_conflicts(ordered.iter().copied()) {
            match self.conflict_policy {
                ConflictPolicy::Fail => return Err(MergeError::Conflicts(conflicts)),
                ConflictPolicy::Warn => {
                    warn!(%conflicts, "presets cannot be applied cleanly");
                    warnings.push(format!("presets cannot be applied cleanly: {}", conflicts));
                }
            }
        }

        for preset in ordered {
            let (applied, conflicts) = merge_domain_spec(&mut merged, &preset.spec);
            debug!(preset = %preset.name, applied, "preset merged");
            if let Some(conflicts) = conflicts {
                let msg = if applied {
                    format!(
                        "some settings were not applied for preset '{}': {}",
                        preset.name, conflicts
                    )
                } else {
                    format!("unable to apply preset '{}': {}", preset.name, conflicts)
                };
                warnings.push(msg);
            }
        }

        Ok(MergeOutcome {
            domain: merged,
            warnings,
        })
    }
}
