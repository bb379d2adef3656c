//! Domain specification data model.
//!
//! The wire format is a camelCase JSON document, a subset of the upstream
//! virtualization API this service fronts. A [`DomainSpec`] is the mutable
//! merge target; a [`PresetSpec`] has the same field shape but every field is
//! optional, absence meaning "no opinion".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The configuration document describing a virtual machine's hardware and
/// runtime settings. Merge-relevant fields only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Cpu>,

    /// Recognized but carries no merge policy yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<Memory>,

    /// Recognized but carries no merge policy yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine: Option<Machine>,

    pub resources: Resources,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware: Option<Firmware>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock: Option<Clock>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,

    pub devices: Devices,
}

/// A fragment with the same field shape as [`DomainSpec`], proposing values
/// for some subset of its fields. Read-only to the merge engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresetSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Cpu>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<Memory>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine: Option<Machine>,

    pub resources: Resources,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware: Option<Firmware>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock: Option<Clock>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Features>,

    pub devices: Devices,
}

impl From<&PresetSpec> for DomainSpec {
    /// View a preset fragment as a domain spec, for preset-to-preset
    /// conflict checks.
    fn from(preset: &PresetSpec) -> Self {
        DomainSpec {
            cpu: preset.cpu.clone(),
            memory: preset.memory.clone(),
            machine: preset.machine.clone(),
            resources: preset.resources.clone(),
            firmware: preset.firmware.clone(),
            clock: preset.clock.clone(),
            features: preset.features.clone(),
            devices: preset.devices.clone(),
        }
    }
}

/// A named, optionally prioritized preset fragment. Higher priority presets
/// are applied earlier, so they win under first-wins policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    #[serde(default)]
    pub spec: PresetSpec,
}

/// The result of merging a preset collection into a base spec.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub domain: DomainSpec,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cpu {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default)]
    pub cores: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Memory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest: Option<Quantity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    #[serde(rename = "type")]
    pub machine_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resources {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub requests: BTreeMap<String, Quantity>,
}

/// Opaque firmware block, compared by full structural equality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Firmware {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clock {
    pub offset: ClockOffset,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<Timer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClockOffset {
    Utc,
    Timezone(String),
}

/// Per-timer tick policies ("delay", "catchup", "discard", ...). Opaque to
/// the merge engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hpet: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Features {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acpi: Option<FeatureState>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub apic: Option<FeatureState>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperv: Option<FeatureState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureState {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Devices {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watchdog: Option<Watchdog>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watchdog {
    pub name: String,
    pub action: WatchdogAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchdogAction {
    Reset,
    Poweroff,
    Shutdown,
}

/// A resource quantity string: an integer with an optional scale suffix
/// (`250m`, `2`, `512Mi`, `1G`).
///
/// The text is kept verbatim for display and serialization; comparison uses
/// the canonical value in thousandths of a unit, so `1Ki == 1024`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity {
    raw: String,
    milli: i128,
}

impl Quantity {
    /// Canonical value in thousandths of a unit.
    pub fn milli_value(&self) -> i128 {
        self.milli
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid quantity '{0}'")]
pub struct ParseQuantityError(String);

impl FromStr for Quantity {
    type Err = ParseQuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        let (digits, suffix) = s.split_at(split);
        let value: i128 = digits
            .parse()
            .map_err(|_| ParseQuantityError(s.to_string()))?;
        let scale: i128 = match suffix {
            "m" => 1,
            "" => 1_000,
            "k" => 1_000_000,
            "M" => 1_000_000_000,
            "G" => 1_000_000_000_000,
            "T" => 1_000_000_000_000_000,
            "Ki" => 1_024 * 1_000,
            "Mi" => 1_024 * 1_024 * 1_000,
            "Gi" => 1_024 * 1_024 * 1_024 * 1_000,
            "Ti" => 1_024i128 * 1_024 * 1_024 * 1_024 * 1_000,
            _ => return Err(ParseQuantityError(s.to_string())),
        };
        let milli = value
            .checked_mul(scale)
            .ok_or_else(|| ParseQuantityError(s.to_string()))?;
        Ok(Self {
            raw: s.to_string(),
            milli,
        })
    }
}

impl TryFrom<String> for Quantity {
    type Error = ParseQuantityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Quantity> for String {
    fn from(quantity: Quantity) -> Self {
        quantity.raw
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.milli == other.milli
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.milli.cmp(&other.milli)
    }
}
