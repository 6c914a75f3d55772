use anyhow::Result;
use clap::ArgMatches;
use colored::*;
use humansize::{format_size, BINARY};

use crate::core::engine::{HardwareEngine, Snapshot};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut engine = HardwareEngine::new();
    let snapshot = engine.snapshot();

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        render(&snapshot);
    }

    Ok(())
}

/// Terminal rendering of one snapshot. Presentation only: rounding and
/// clamping here never feed back into the engine.
pub(crate) fn render(snapshot: &Snapshot) {
    println!("{}", "System".bold());
    println!(
        "  {} {} ({}) on {}",
        snapshot.system.os, snapshot.system.os_version, snapshot.system.arch, snapshot.system.hostname
    );
    println!("  kernel {}, up since {}", snapshot.system.kernel, snapshot.system.boot_time);

    println!("{}", "CPU".bold());
    println!(
        "  {} ({} cores, {} physical)",
        snapshot.cpu.name, snapshot.cpu.cores, snapshot.cpu.physical_cores
    );
    println!("  usage: {:.1}%", snapshot.cpu.total_usage);

    println!("{}", "Memory".bold());
    println!(
        "  {} / {} ({:.1}%)",
        format_size(snapshot.memory.used, BINARY),
        format_size(snapshot.memory.total, BINARY),
        snapshot.memory.percent
    );
    if snapshot.memory.swap_total > 0 {
        println!(
            "  swap: {} / {} ({:.1}%)",
            format_size(snapshot.memory.swap_used, BINARY),
            format_size(snapshot.memory.swap_total, BINARY),
            snapshot.memory.swap_percent
        );
    }

    println!("{}", "Disks".bold());
    for disk in &snapshot.disk {
        println!(
            "  {} on {}: {} / {} ({:.1}%)",
            disk.device,
            disk.mountpoint,
            format_size(disk.used, BINARY),
            format_size(disk.total, BINARY),
            disk.percent
        );
    }

    println!("{}", "GPU".bold());
    for device in &snapshot.gpu {
        if let Some(error) = &device.error {
            println!("  [{}] {}", device.id, error.red());
            continue;
        }
        let temperature = device
            .temperature
            .map(|t| format!("{:.0}°C", t))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  [{}] {}: load {:.0}%, memory {} / {} ({:.1}%), {}",
            device.id,
            device.name,
            device.load_percent,
            device.memory.used_display,
            device.memory.total_display,
            device.memory.percent,
            temperature
        );
    }

    if !snapshot.temperatures.is_empty() {
        println!("{}", "Temperatures".bold());
        for (name, reading) in &snapshot.temperatures {
            match reading.max {
                Some(max) => println!("  {}: {:.1}°C (max {:.1}°C)", name, reading.value, max),
                None => println!("  {}: {:.1}°C", name, reading.value),
            }
        }
    }

    println!("{}", "Network".bold());
    // Wraparound can make a rate negative; clamp for display only.
    println!(
        "  up {}/s, down {}/s",
        format_size(snapshot.network.upload_bytes_per_sec.max(0.0) as u64, BINARY),
        format_size(snapshot.network.download_bytes_per_sec.max(0.0) as u64, BINARY)
    );
}
