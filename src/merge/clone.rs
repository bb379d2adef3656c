//! Deep copies of domain specs via their canonical JSON form.

use crate::error::MergeError;
use crate::types::DomainSpec;

/// Produce a structurally independent copy of `spec`.
///
/// Round-trips through the canonical serialized form, so a spec that cannot
/// be serialized fails with [`MergeError::Serialization`] before any preset
/// is applied. Mutating the copy is never observable through the original.
pub fn clone_domain_spec(spec: &DomainSpec) -> Result<DomainSpec, MergeError> {
    let data = serde_json::to_vec(spec)?;
    let clone = serde_json::from_slice(&data)?;
    Ok(clone)
}
