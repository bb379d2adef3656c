//! End-to-end merge scenarios through the Merger facade.

use virt_profiles::merge::Merger;
use virt_profiles::types::{
    Cpu, DomainSpec, Firmware, Preset, PresetSpec, Quantity, Resources,
};

fn quantity(s: &str) -> Quantity {
    s.parse().unwrap()
}

fn preset(name: &str, priority: i64, spec: PresetSpec) -> Preset {
    Preset {
        name: name.to_string(),
        priority: Some(priority),
        spec,
    }
}

fn cpu_preset(name: &str, priority: i64, cores: u32) -> Preset {
    preset(
        name,
        priority,
        PresetSpec {
            cpu: Some(Cpu { model: None, cores }),
            ..Default::default()
        },
    )
}

#[test]
fn test_single_preset_sets_cpu_cores() {
    let base = DomainSpec::default();
    let outcome = Merger::new()
        .apply_presets(&base, &[cpu_preset("small", 1, 4)])
        .unwrap();

    assert_eq!(outcome.domain.cpu.as_ref().unwrap().cores, 4);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_smaller_preset_never_downgrades_cores() {
    let base = DomainSpec {
        cpu: Some(Cpu {
            model: None,
            cores: 4,
        }),
        ..Default::default()
    };
    let outcome = Merger::new()
        .apply_presets(&base, &[cpu_preset("tiny", 1, 2)])
        .unwrap();

    assert_eq!(outcome.domain.cpu.as_ref().unwrap().cores, 4);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_resource_requests_union_max_across_presets() {
    let a = preset(
        "memory-small",
        1,
        PresetSpec {
            resources: Resources {
                requests: [("memory".to_string(), quantity("512Mi"))]
                    .into_iter()
                    .collect(),
            },
            ..Default::default()
        },
    );
    let b = preset(
        "memory-large",
        2,
        PresetSpec {
            resources: Resources {
                requests: [
                    ("memory".to_string(), quantity("1Gi")),
                    ("cpu".to_string(), quantity("500m")),
                ]
                .into_iter()
                .collect(),
            },
            ..Default::default()
        },
    );

    let outcome = Merger::new()
        .apply_presets(&DomainSpec::default(), &[a, b])
        .unwrap();
    let requests = &outcome.domain.resources.requests;
    assert_eq!(requests["memory"], quantity("1Gi"));
    assert_eq!(requests["cpu"], quantity("500m"));
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_priority_order_decides_first_wins_fields() {
    // sorted descending: B (30), C (20), A (10); B's firmware wins
    let firmware = |uuid: &str| Firmware {
        uuid: Some(uuid.to_string()),
        serial: None,
    };
    let presets = vec![
        preset(
            "A",
            10,
            PresetSpec {
                firmware: Some(firmware("aaaa")),
                ..Default::default()
            },
        ),
        preset(
            "B",
            30,
            PresetSpec {
                firmware: Some(firmware("bbbb")),
                ..Default::default()
            },
        ),
        preset(
            "C",
            20,
            PresetSpec {
                firmware: Some(firmware("cccc")),
                ..Default::default()
            },
        ),
    ];

    let outcome = Merger::new()
        .apply_presets(&DomainSpec::default(), &presets)
        .unwrap();
    assert_eq!(
        outcome.domain.firmware.unwrap().uuid.as_deref(),
        Some("bbbb")
    );
    // the pairwise aggregate plus the two losing presets
    assert!(!outcome.warnings.is_empty());
}

#[test]
fn test_merging_twice_is_idempotent() {
    let p = preset(
        "everything",
        1,
        PresetSpec {
            cpu: Some(Cpu {
                model: Some("Haswell".to_string()),
                cores: 4,
            }),
            firmware: Some(Firmware {
                uuid: Some("aaaa".to_string()),
                serial: None,
            }),
            resources: Resources {
                requests: [("memory".to_string(), quantity("1Gi"))]
                    .into_iter()
                    .collect(),
            },
            ..Default::default()
        },
    );

    let once = Merger::new()
        .apply_presets(&DomainSpec::default(), std::slice::from_ref(&p))
        .unwrap();
    let twice = Merger::new()
        .apply_presets(&DomainSpec::default(), &[p.clone(), p])
        .unwrap();

    assert_eq!(once.domain, twice.domain);
}

#[test]
fn test_unsorted_merger_respects_submitted_order() {
    let firmware = |uuid: &str| Firmware {
        uuid: Some(uuid.to_string()),
        serial: None,
    };
    let presets = vec![
        preset(
            "low",
            1,
            PresetSpec {
                firmware: Some(firmware("low-wins")),
                ..Default::default()
            },
        ),
        preset(
            "high",
            99,
            PresetSpec {
                firmware: Some(firmware("high-loses")),
                ..Default::default()
            },
        ),
    ];

    let outcome = Merger::new()
        .with_sorting(false)
        .apply_presets(&DomainSpec::default(), &presets)
        .unwrap();
    assert_eq!(
        outcome.domain.firmware.unwrap().uuid.as_deref(),
        Some("low-wins")
    );
}
