//! Conflict detection between presets and domain specs.
//!
//! A conflict is two non-absent, unequal values for the same recognized field
//! path. One side being absent is never a conflict. Detection is symmetric
//! and path-scoped; all discovered conflicts are reported together.

use crate::error::{Conflict, Conflicts, PresetConflict, PresetConflicts};
use crate::types::{DomainSpec, Preset, PresetSpec};

/// Check one preset fragment against a (possibly evolving) domain spec.
pub fn check_against_base(preset: &PresetSpec, base: &DomainSpec) -> Result<(), Conflicts> {
    let found = conflicts_between(preset, base);
    if found.is_empty() {
        Ok(())
    } else {
        Err(Conflicts(found))
    }
}

/// Check two preset fragments against each other.
pub fn check_conflicts(a: &PresetSpec, b: &PresetSpec) -> Result<(), Conflicts> {
    check_against_base(a, &DomainSpec::from(b))
}

/// Compare the spec of every preset pair to ensure they can all be applied
/// cleanly. Each unordered pair is compared exactly once; every pairwise
/// failure is accumulated into the aggregate.
pub fn check_preset_conflicts<'a, I>(presets: I) -> Result<(), PresetConflicts>
where
    I: IntoIterator<Item = &'a Preset>,
{
    let presets: Vec<&Preset> = presets.into_iter().collect();
    let mut failures = Vec::new();
    for (i, preset) in presets.iter().enumerate() {
        for visited in &presets[..i] {
            if let Err(conflicts) = check_conflicts(&preset.spec, &visited.spec) {
                failures.push(PresetConflict {
                    first: preset.name.clone(),
                    second: visited.name.clone(),
                    conflicts,
                });
            }
        }
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(PresetConflicts(failures))
    }
}

fn conflicts_between(preset: &PresetSpec, target: &DomainSpec) -> Vec<Conflict> {
    let mut found = Vec::new();

    // Resource requests never conflict: the merge takes the union of the
    // keys and the larger value where they overlap. Same for CPU cores.

    if let (Some(preset_cpu), Some(target_cpu)) = (&preset.cpu, &target.cpu) {
        if let (Some(preset_model), Some(target_model)) = (&preset_cpu.model, &target_cpu.model) {
            if preset_model != target_model {
                found.push(Conflict::new("spec.cpu.model", preset_model, target_model));
            }
        }
    }

    // memory and machine type are recognized field paths without a merge
    // policy yet, so they are not checked either

    if let (Some(preset_fw), Some(target_fw)) = (&preset.firmware, &target.firmware) {
        if preset_fw != target_fw {
            found.push(Conflict::new("spec.firmware", preset_fw, target_fw));
        }
    }

    if let (Some(preset_clock), Some(target_clock)) = (&preset.clock, &target.clock) {
        if preset_clock.offset != target_clock.offset {
            found.push(Conflict::new(
                "spec.clock.clockoffset",
                &preset_clock.offset,
                &target_clock.offset,
            ));
        }
        if let (Some(preset_timer), Some(target_timer)) = (&preset_clock.timer, &target_clock.timer)
        {
            if preset_timer != target_timer {
                found.push(Conflict::new("spec.clock.timer", preset_timer, target_timer));
            }
        }
    }

    if let (Some(preset_features), Some(target_features)) = (&preset.features, &target.features) {
        if preset_features != target_features {
            found.push(Conflict::new(
                "spec.features",
                preset_features,
                target_features,
            ));
        }
    }

    if let (Some(preset_wd), Some(target_wd)) = (&preset.devices.watchdog, &target.devices.watchdog)
    {
        if preset_wd != target_wd {
            found.push(Conflict::new("spec.devices.watchdog", preset_wd, target_wd));
        }
    }

    found
}
