//! End-to-end checks on a real engine instance.
//!
//! These run on whatever hardware the CI host has, so they assert
//! structural completeness and invariants rather than concrete readings:
//! a host without sensors or a GPU must still produce a full snapshot.

use sysglance::HardwareEngine;

#[test]
fn test_snapshot_is_structurally_complete() {
    let mut engine = HardwareEngine::new();
    let snapshot = engine.snapshot();

    // GPU enumeration yields at least one entry even with no GPU: the
    // unavailable case is a single error-marker element, never empty.
    assert!(!snapshot.gpu.is_empty());

    // Same containment rule for disks: a failed enumeration degrades to a
    // single error-annotated entry.
    assert!(!snapshot.disk.is_empty());

    assert!(snapshot.cpu.cores > 0);
    assert_eq!(snapshot.cpu.usage_per_core.len(), snapshot.cpu.cores);
    assert!(!snapshot.system.os.is_empty());
}

#[test]
fn test_percentages_stay_in_range() {
    let mut engine = HardwareEngine::new();
    let snapshot = engine.snapshot();

    assert!((0.0..=100.0).contains(&snapshot.memory.percent));
    assert!((0.0..=100.0).contains(&snapshot.memory.swap_percent));
    for disk in &snapshot.disk {
        assert!((0.0..=100.0).contains(&disk.percent));
    }
    for device in &snapshot.gpu {
        assert!((0.0..=100.0).contains(&device.memory.percent));
    }
}

#[test]
fn test_cpu_total_usage_is_mean_of_cores() {
    let mut engine = HardwareEngine::new();
    let snapshot = engine.snapshot();

    if snapshot.cpu.usage_per_core.is_empty() {
        assert_eq!(snapshot.cpu.total_usage, 0.0);
    } else {
        let mean = snapshot.cpu.usage_per_core.iter().sum::<f32>()
            / snapshot.cpu.usage_per_core.len() as f32;
        assert!((snapshot.cpu.total_usage - mean).abs() < 1e-3);
    }
}

#[test]
fn test_first_poll_reports_zero_network_rate() {
    let mut engine = HardwareEngine::new();
    let snapshot = engine.snapshot();

    assert_eq!(snapshot.network.upload_bytes_per_sec, 0.0);
    assert_eq!(snapshot.network.download_bytes_per_sec, 0.0);
}

#[test]
fn test_consecutive_polls_produce_finite_rates() {
    let mut engine = HardwareEngine::new();
    engine.snapshot();
    let second = engine.snapshot();

    assert!(second.network.upload_bytes_per_sec.is_finite());
    assert!(second.network.download_bytes_per_sec.is_finite());
}

#[test]
fn test_snapshot_serializes_to_json() {
    let mut engine = HardwareEngine::new();
    let snapshot = engine.snapshot();

    let json = serde_json::to_value(&snapshot).expect("snapshot must serialize");
    for field in ["cpu", "memory", "disk", "gpu", "temperatures", "network", "system"] {
        assert!(json.get(field).is_some(), "missing field {}", field);
    }
}
