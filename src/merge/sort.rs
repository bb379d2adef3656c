//! Priority ordering for preset collections.

use crate::error::SortError;
use crate::types::Preset;

/// Order presets by descending priority.
///
/// The higher the priority, the earlier the preset sits in the sequence, so
/// the earlier it is applied and the more it wins under first-wins and max
/// policies. The sort is stable: ties keep their submitted order.
///
/// If any preset lacks a priority the whole batch fails with a recoverable
/// [`SortError`] naming every offender; callers proceed with the submitted
/// order and surface the failure as a warning.
pub fn sort_presets(presets: &[Preset]) -> Result<Vec<&Preset>, SortError> {
    let missing: Vec<String> = presets
        .iter()
        .filter(|p| p.priority.is_none())
        .map(|p| p.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(SortError { missing });
    }

    let mut ordered: Vec<&Preset> = presets.iter().collect();
    ordered.sort_by(|a, b| b.priority.cmp(&a.priority));
    Ok(ordered)
}
