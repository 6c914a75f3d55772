//! GPU collection.
//!
//! Produces a device sequence aligned 1:1 with the primary backend's
//! enumeration. Metrics the primary backend cannot supply are filled from a
//! bounded external diagnostic query; a device whose enrichment fails still
//! occupies its slot as a degraded entry.

use crate::error::{GlanceError, Result};
use crate::platform;
use crate::utils::format::format_mb;

use super::metrics::{GpuDevice, GpuMemory};
use super::numeric::safe_percent;

/// Raw per-device readings from the primary enumeration backend.
///
/// `None` marks a metric the backend could not supply; the collector
/// decides whether to fall back or degrade.
#[derive(Debug, Clone, Default)]
pub struct GpuDeviceRaw {
    pub name: String,
    pub uuid: String,
    /// `None` or a negative value means "unknown".
    pub load_percent: Option<f64>,
    pub memory_total_mb: Option<f64>,
    pub memory_used_mb: Option<f64>,
    pub memory_free_mb: Option<f64>,
    pub temperature: Option<f64>,
}

/// Primary GPU enumeration backend.
pub trait GpuBackend: Send {
    fn label(&self) -> &'static str;

    fn device_count(&self) -> Result<u32>;

    fn read_device(&self, index: u32) -> Result<GpuDeviceRaw>;
}

/// Metric requested from the external diagnostic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackMetric {
    Utilization,
    Temperature,
}

impl FallbackMetric {
    /// Field name in `nvidia-smi --query-gpu` syntax.
    pub fn query_field(&self) -> &'static str {
        match self {
            FallbackMetric::Utilization => "utilization.gpu",
            FallbackMetric::Temperature => "temperature.gpu",
        }
    }
}

/// Secondary per-device data source, invoked under a timeout.
pub trait GpuFallback: Send {
    fn available(&self) -> bool;

    fn query(&self, device: u32, metric: FallbackMetric) -> Result<f64>;
}

/// Collector pairing the primary backend with the command fallback.
pub struct GpuCollector {
    backend: Option<Box<dyn GpuBackend>>,
    fallback: Box<dyn GpuFallback>,
    unavailable_reason: Option<String>,
}

impl GpuCollector {
    /// Detect the primary backend once at engine construction. A missing
    /// backend is recorded, not propagated: collection then yields the
    /// error-marker entry.
    pub fn detect() -> Self {
        let (backend, unavailable_reason) = match platform::gpu::detect_backend() {
            Ok(backend) => (Some(backend), None),
            Err(e) => {
                log::info!("GPU backend unavailable: {}", e);
                (None, Some(e.to_string()))
            }
        };

        Self {
            backend,
            fallback: Box::new(platform::gpu::SmiFallback::new()),
            unavailable_reason,
        }
    }

    /// Build a collector from explicit parts.
    pub fn with_parts(backend: Option<Box<dyn GpuBackend>>, fallback: Box<dyn GpuFallback>) -> Self {
        let unavailable_reason = backend
            .is_none()
            .then(|| "no GPU backend configured".to_string());
        Self {
            backend,
            fallback,
            unavailable_reason,
        }
    }

    /// Collect one entry per enumerated device.
    ///
    /// When enumeration is impossible the result is a single error-marker
    /// entry, never an empty sequence: callers expect at least one element
    /// to render a "no GPU" state.
    pub fn collect(&self) -> Vec<GpuDevice> {
        let Some(backend) = self.backend.as_deref() else {
            let reason = self
                .unavailable_reason
                .clone()
                .unwrap_or_else(|| "GPU monitoring unavailable".to_string());
            return vec![GpuDevice::unavailable(reason)];
        };

        let count = match backend.device_count() {
            Ok(0) => return vec![GpuDevice::unavailable("no GPU devices detected")],
            Ok(count) => count,
            Err(e) => {
                log::warn!("GPU enumeration failed: {}", e);
                return vec![GpuDevice::unavailable(format!("GPU enumeration failed: {}", e))];
            }
        };

        (0..count).map(|id| self.collect_device(backend, id)).collect()
    }

    fn collect_device(&self, backend: &dyn GpuBackend, id: u32) -> GpuDevice {
        match backend.read_device(id) {
            Ok(raw) => self.build_device(id, raw),
            Err(e) => {
                log::debug!("device {} query failed on {}: {}", id, backend.label(), e);
                GpuDevice {
                    id,
                    error: Some(e.to_string()),
                    ..Default::default()
                }
            }
        }
    }

    /// Query the fallback, skipping the spawn attempt entirely when the
    /// diagnostic tool is not installed.
    fn query_fallback(&self, device: u32, metric: FallbackMetric) -> Result<f64> {
        if !self.fallback.available() {
            return Err(GlanceError::source_unavailable(
                "fallback diagnostic tool not installed",
            ));
        }
        self.fallback.query(device, metric)
    }

    fn build_device(&self, id: u32, raw: GpuDeviceRaw) -> GpuDevice {
        let mut error = None;

        let load_percent = match raw.load_percent {
            Some(load) if load >= 0.0 => load,
            _ => match self.query_fallback(id, FallbackMetric::Utilization) {
                Ok(load) => load,
                Err(e) => {
                    log::debug!("load fallback for device {} failed: {}", id, e);
                    error = Some(format!("load unavailable: {}", e));
                    0.0
                }
            },
        };

        // Zero is a valid temperature; unknown stays absent.
        let temperature = match raw.temperature {
            Some(t) => Some(t),
            None => match self.query_fallback(id, FallbackMetric::Temperature) {
                Ok(t) => Some(t),
                Err(e) => {
                    log::debug!("temperature fallback for device {} failed: {}", id, e);
                    None
                }
            },
        };

        let total_mb = raw.memory_total_mb.unwrap_or(0.0);
        let used_mb = raw.memory_used_mb.unwrap_or(0.0);
        let free_mb = raw.memory_free_mb.unwrap_or(0.0);
        let memory = GpuMemory {
            total_mb,
            used_mb,
            free_mb,
            total_display: format_mb(total_mb),
            used_display: format_mb(used_mb),
            free_display: format_mb(free_mb),
            percent: safe_percent(raw.memory_used_mb, raw.memory_total_mb),
        };

        GpuDevice {
            id,
            name: raw.name,
            load_percent,
            memory,
            temperature,
            uuid: raw.uuid,
            error,
        }
    }
}
