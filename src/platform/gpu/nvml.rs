#[cfg(feature = "nvml")]
use nvml_wrapper::{enum_wrappers::device::TemperatureSensor, Nvml};

use crate::core::engine::{GpuBackend, GpuDeviceRaw};
#[cfg(feature = "nvml")]
use crate::error::GlanceError;
use crate::error::Result;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// NVIDIA enumeration backend using NVML.
pub struct NvmlBackend {
    #[cfg(feature = "nvml")]
    nvml: Nvml,
}

impl NvmlBackend {
    /// Initialize NVML. Fails when the driver is not installed or the
    /// library cannot be loaded.
    pub fn new() -> Result<Self> {
        #[cfg(feature = "nvml")]
        {
            let nvml = Nvml::init().map_err(|e| {
                GlanceError::source_unavailable(format!("failed to init NVML: {}", e))
            })?;
            Ok(Self { nvml })
        }
        #[cfg(not(feature = "nvml"))]
        {
            Err(crate::error::GlanceError::source_unavailable(
                "NVIDIA GPU support not enabled",
            ))
        }
    }
}

impl GpuBackend for NvmlBackend {
    fn label(&self) -> &'static str {
        "nvml"
    }

    fn device_count(&self) -> Result<u32> {
        #[cfg(feature = "nvml")]
        {
            self.nvml.device_count().map_err(|e| {
                GlanceError::source_query_failed(format!("NVML device count: {}", e))
            })
        }
        #[cfg(not(feature = "nvml"))]
        {
            Ok(0)
        }
    }

    fn read_device(&self, index: u32) -> Result<GpuDeviceRaw> {
        #[cfg(feature = "nvml")]
        {
            let device = self.nvml.device_by_index(index).map_err(|e| {
                GlanceError::source_query_failed(format!("NVML device {}: {}", index, e))
            })?;

            let name = device
                .name()
                .unwrap_or_else(|_| "Unknown NVIDIA GPU".to_string());
            let uuid = device.uuid().unwrap_or_default();

            // NVML reports utilization as unsigned; a failed query maps to
            // "unknown" so the collector can try the fallback path.
            let load_percent = device.utilization_rates().ok().map(|u| u.gpu as f64);

            let memory = device.memory_info().ok();
            let memory_total_mb = memory.as_ref().map(|m| m.total as f64 / BYTES_PER_MB);
            let memory_used_mb = memory.as_ref().map(|m| m.used as f64 / BYTES_PER_MB);
            let memory_free_mb = memory.as_ref().map(|m| m.free as f64 / BYTES_PER_MB);

            let temperature = device
                .temperature(TemperatureSensor::Gpu)
                .ok()
                .map(f64::from);

            Ok(GpuDeviceRaw {
                name,
                uuid,
                load_percent,
                memory_total_mb,
                memory_used_mb,
                memory_free_mb,
                temperature,
            })
        }
        #[cfg(not(feature = "nvml"))]
        {
            let _ = index;
            Err(crate::error::GlanceError::source_unavailable(
                "NVIDIA GPU support not enabled",
            ))
        }
    }
}
