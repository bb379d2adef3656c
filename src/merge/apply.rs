//! Per-field merge policies.
//!
//! Policy table: resource requests take the union of the keys and the larger
//! quantity where keys overlap; CPU is adopted wholesale when unset and its
//! core count only ever grows; firmware, clock offset, timer, features and
//! the watchdog device are first-wins. Memory and machine type are
//! recognized but have no policy yet.

use crate::error::Conflicts;
use crate::types::{Clock, DomainSpec, PresetSpec};

use super::conflict::check_against_base;

/// Merge one preset fragment into `target`, which must be a clone owned by
/// the merge in progress.
///
/// Conflicts are computed against the pre-merge state and returned alongside
/// the result; every field policy is still attempted, so partial application
/// is expected. `applied` is true iff at least one field was newly set or
/// changed by this call.
pub fn merge_domain_spec(target: &mut DomainSpec, preset: &PresetSpec) -> (bool, Option<Conflicts>) {
    let conflicts = check_against_base(preset, target).err();
    let mut applied = false;

    for (key, value) in &preset.resources.requests {
        match target.resources.requests.get(key) {
            Some(current) if value <= current => {}
            _ => {
                target.resources.requests.insert(key.clone(), value.clone());
                applied = true;
            }
        }
    }

    if let Some(preset_cpu) = &preset.cpu {
        match &mut target.cpu {
            None => {
                target.cpu = Some(preset_cpu.clone());
                applied = true;
            }
            Some(cpu) if preset_cpu.cores > cpu.cores => {
                cpu.cores = preset_cpu.cores;
                applied = true;
            }
            Some(_) => {}
        }
    }

    // memory and machine type: recognized, no merge policy yet

    if let Some(firmware) = &preset.firmware {
        if target.firmware.is_none() {
            target.firmware = Some(firmware.clone());
            applied = true;
        }
    }

    if let Some(preset_clock) = &preset.clock {
        if target.clock.is_none() {
            // adopt the offset only; the timer follows its own rule below
            target.clock = Some(Clock {
                offset: preset_clock.offset.clone(),
                timer: None,
            });
            applied = true;
        }
        if let (Some(timer), Some(clock)) = (&preset_clock.timer, &mut target.clock) {
            if clock.timer.is_none() {
                clock.timer = Some(timer.clone());
                applied = true;
            }
        }
    }

    if let Some(features) = &preset.features {
        if target.features.is_none() {
            target.features = Some(features.clone());
            applied = true;
        }
    }

    if let Some(watchdog) = &preset.devices.watchdog {
        if target.devices.watchdog.is_none() {
            target.devices.watchdog = Some(watchdog.clone());
            applied = true;
        }
    }

    (applied, conflicts)
}
