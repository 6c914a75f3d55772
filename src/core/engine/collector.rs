use std::collections::BTreeMap;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Local, TimeZone};
use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System,
    MINIMUM_CPU_UPDATE_INTERVAL,
};

use super::gpu::GpuCollector;
use super::metrics::{
    CpuInfo, DiskInfo, MemoryInfo, NetworkCounters, NetworkRate, Snapshot, SystemIdentity,
};
use super::numeric::safe_percent;
use super::rate::NetworkRateSampler;
use super::temperature::TemperatureChain;

/// Aggregates every collector into one snapshot per poll.
///
/// Constructed once at process start; the temperature chain's backend
/// handles and the rate sampler's baseline are the only state carried
/// across polls.
pub struct HardwareEngine {
    system: System,
    disks: Disks,
    networks: Networks,
    temperatures: TemperatureChain,
    gpu: GpuCollector,
    rate: NetworkRateSampler,
}

impl HardwareEngine {
    /// Detect platform backends and open the sysinfo handles.
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything());

        Self {
            system: System::new_with_specifics(refresh_kind),
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            temperatures: TemperatureChain::new(),
            gpu: GpuCollector::detect(),
            rate: NetworkRateSampler::new(),
        }
    }

    /// Collect a complete snapshot.
    ///
    /// Never fails: each sub-collector degrades to a defaulted,
    /// error-annotated structure when its source is missing or misbehaves.
    pub fn snapshot(&mut self) -> Snapshot {
        Snapshot {
            cpu: self.collect_cpu(),
            memory: self.collect_memory(),
            disk: self.collect_disks(),
            gpu: self.gpu.collect(),
            temperatures: self.temperatures.read_all(),
            network: self.collect_network(),
            system: self.collect_system(),
        }
    }

    fn collect_cpu(&mut self) -> CpuInfo {
        // Two refreshes separated by the minimum interval give sysinfo a
        // usage window to measure over.
        self.system.refresh_cpu_all();
        thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
        self.system.refresh_cpu_all();

        let cpus = self.system.cpus();
        let usage_per_core: Vec<f32> = cpus.iter().map(|cpu| cpu.cpu_usage()).collect();
        let total_usage = if usage_per_core.is_empty() {
            0.0
        } else {
            usage_per_core.iter().sum::<f32>() / usage_per_core.len() as f32
        };

        CpuInfo {
            name: cpus
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown CPU".to_string()),
            cores: cpus.len(),
            physical_cores: System::physical_core_count().unwrap_or(0),
            usage_per_core,
            total_usage,
            frequency_mhz: cpus.first().map(|cpu| cpu.frequency()),
            error: cpus
                .is_empty()
                .then(|| "no CPU cores reported".to_string()),
        }
    }

    fn collect_memory(&mut self) -> MemoryInfo {
        self.system.refresh_memory();

        let total = self.system.total_memory();
        let used = self.system.used_memory();
        let swap_total = self.system.total_swap();
        let swap_used = self.system.used_swap();

        MemoryInfo {
            total,
            available: self.system.available_memory(),
            used,
            percent: safe_percent(Some(used as f64), Some(total as f64)) as f32,
            swap_total,
            swap_used,
            swap_free: swap_total.saturating_sub(swap_used),
            swap_percent: safe_percent(Some(swap_used as f64), Some(swap_total as f64)) as f32,
            error: (total == 0).then(|| "memory totals unavailable".to_string()),
        }
    }

    fn collect_disks(&mut self) -> Vec<DiskInfo> {
        self.disks.refresh(true);

        let disks = self
            .disks
            .iter()
            .map(|disk| {
                let total = disk.total_space();
                let free = disk.available_space();
                let used = total.saturating_sub(free);

                DiskInfo {
                    device: disk.name().to_string_lossy().to_string(),
                    mountpoint: disk.mount_point().to_string_lossy().to_string(),
                    filesystem: disk.file_system().to_string_lossy().to_string(),
                    total,
                    used,
                    free,
                    percent: safe_percent(Some(used as f64), Some(total as f64)) as f32,
                    error: None,
                }
            })
            .collect();

        disk_list_or_marker(disks)
    }

    fn collect_network(&mut self) -> NetworkRate {
        self.networks.refresh(true);

        let (bytes_sent, bytes_recv) = self
            .networks
            .values()
            .fold((0u64, 0u64), |(sent, recv), data| {
                (
                    sent.saturating_add(data.total_transmitted()),
                    recv.saturating_add(data.total_received()),
                )
            });

        let timestamp_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        self.rate.sample(NetworkCounters {
            bytes_sent,
            bytes_recv,
            timestamp_secs,
        })
    }

    fn collect_system(&mut self) -> SystemIdentity {
        let boot_time = Local
            .timestamp_opt(System::boot_time() as i64, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

        let mut network_interfaces = BTreeMap::new();
        for (name, data) in self.networks.iter() {
            let addresses: Vec<String> = data
                .ip_networks()
                .iter()
                .map(|ip| ip.addr.to_string())
                .collect();
            network_interfaces.insert(name.clone(), addresses);
        }

        SystemIdentity {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_default(),
            kernel: System::kernel_version().unwrap_or_default(),
            arch: std::env::consts::ARCH.to_string(),
            hostname: System::host_name().unwrap_or_default(),
            boot_time,
            network_interfaces,
            error: None,
        }
    }
}

impl Default for HardwareEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// A failed or empty disk enumeration degrades to a single error-annotated
/// entry, never an empty sequence.
fn disk_list_or_marker(disks: Vec<DiskInfo>) -> Vec<DiskInfo> {
    if disks.is_empty() {
        return vec![DiskInfo {
            error: Some("no disks enumerated".to_string()),
            ..Default::default()
        }];
    }
    disks
}
