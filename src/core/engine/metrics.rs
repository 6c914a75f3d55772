use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Complete hardware telemetry snapshot.
///
/// One instance per poll. Every field is present even when its source
/// failed; a failed source degrades to a defaulted, error-annotated
/// sub-structure instead of a missing field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    pub disk: Vec<DiskInfo>,
    pub gpu: Vec<GpuDevice>,
    pub temperatures: BTreeMap<String, TemperatureReading>,
    pub network: NetworkRate,
    pub system: SystemIdentity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuInfo {
    pub name: String,
    pub cores: usize,
    pub physical_cores: usize,
    pub usage_per_core: Vec<f32>,
    /// Arithmetic mean of `usage_per_core`; 0 when no cores were sampled.
    pub total_usage: f32,
    pub frequency_mhz: Option<u64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub percent: f32,
    pub swap_total: u64,
    pub swap_used: u64,
    pub swap_free: u64,
    pub swap_percent: f32,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiskInfo {
    pub device: String,
    pub mountpoint: String,
    pub filesystem: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f32,
    pub error: Option<String>,
}

/// One reading per sensor name. Values are rounded to one decimal at
/// extraction, before the provider merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TemperatureReading {
    pub value: f64,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

/// One entry per physically enumerated device. The sequence index always
/// matches the primary backend's device index, even for degraded entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GpuDevice {
    pub id: u32,
    pub name: String,
    pub load_percent: f64,
    pub memory: GpuMemory,
    /// Absent when unknown. Zero is a valid reading and is never used as a
    /// placeholder for "unknown".
    pub temperature: Option<f64>,
    pub uuid: String,
    pub error: Option<String>,
}

impl GpuDevice {
    /// Marker entry returned when GPU enumeration is unavailable entirely.
    /// Callers expect at least one element to render a "no GPU" state.
    pub fn unavailable<S: Into<String>>(reason: S) -> Self {
        GpuDevice {
            error: Some(reason.into()),
            ..Default::default()
        }
    }
}

/// Raw megabyte values and display strings are both retained: consumers
/// need the raw value for further math and the formatted one for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GpuMemory {
    pub total_mb: f64,
    pub used_mb: f64,
    pub free_mb: f64,
    pub total_display: String,
    pub used_display: String,
    pub free_display: String,
    pub percent: f64,
}

/// Cumulative counters plus the instant they were read, as consumed by the
/// rate sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub timestamp_secs: f64,
}

/// Instantaneous throughput derived from two consecutive counter samples.
///
/// Counter wraparound (interface restart) surfaces as a negative rate;
/// callers may clamp for display.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct NetworkRate {
    pub upload_bytes_per_sec: f64,
    pub download_bytes_per_sec: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemIdentity {
    pub os: String,
    pub os_version: String,
    pub kernel: String,
    pub arch: String,
    pub hostname: String,
    pub boot_time: String,
    pub network_interfaces: BTreeMap<String, Vec<String>>,
    pub error: Option<String>,
}
