//! Hardware telemetry aggregation engine.
//!
//! One long-lived [`HardwareEngine`] turns each poll into a structurally
//! complete [`Snapshot`]: every collector is independently fail-safe, so a
//! missing GPU or sensor backend degrades its own field instead of taking
//! down the whole snapshot.

mod collector;
mod gpu;
mod metrics;
pub mod numeric;
mod rate;
mod temperature;

pub use collector::HardwareEngine;
pub use gpu::{FallbackMetric, GpuBackend, GpuCollector, GpuDeviceRaw, GpuFallback};
pub use metrics::{
    CpuInfo, DiskInfo, GpuDevice, GpuMemory, MemoryInfo, NetworkCounters, NetworkRate, Snapshot,
    SystemIdentity, TemperatureReading,
};
pub use rate::NetworkRateSampler;
pub use temperature::{TemperatureBackend, TemperatureChain};
