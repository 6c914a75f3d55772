//! Platform sensor backends.
//!
//! The generic [`ComponentBackend`] works everywhere sysinfo does; the
//! platform-specific backends supply richer per-sensor max/min bounds where
//! the OS exposes them.

mod component;
#[cfg(target_os = "linux")]
mod hwmon;
#[cfg(windows)]
mod wmi_sensor;

pub use component::ComponentBackend;
#[cfg(target_os = "linux")]
pub use hwmon::HwmonBackend;
#[cfg(windows)]
pub use wmi_sensor::WmiSensorBackend;

use crate::core::engine::TemperatureBackend;
use crate::error::Result;

/// Probe for the platform-specific backend.
///
/// Returns `Ok(None)` on platforms without one, and an error when the
/// backend exists for this platform but cannot be opened (missing driver,
/// no sensors, no permission). Callers record that as a disabled backend.
pub fn platform_backend() -> Result<Option<Box<dyn TemperatureBackend>>> {
    #[cfg(target_os = "linux")]
    {
        HwmonBackend::probe().map(|b| Some(Box::new(b) as Box<dyn TemperatureBackend>))
    }

    #[cfg(windows)]
    {
        WmiSensorBackend::probe().map(|b| Some(Box::new(b) as Box<dyn TemperatureBackend>))
    }

    #[cfg(not(any(target_os = "linux", windows)))]
    {
        Ok(None)
    }
}
