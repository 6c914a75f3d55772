//! GPU-specific platform code.
//!
//! Provides the primary enumeration backend (NVIDIA via NVML) and the
//! external-command fallback used when the primary backend cannot supply a
//! metric.

mod nvml;
mod smi;

pub use nvml::NvmlBackend;
pub use smi::SmiFallback;

use crate::core::engine::GpuBackend;
use crate::error::Result;

/// Attempt to open the primary GPU enumeration backend.
///
/// Returns an error when no supported GPU library is usable on this host;
/// the collector turns that into a single error-marker device entry.
pub fn detect_backend() -> Result<Box<dyn GpuBackend>> {
    let backend = NvmlBackend::new()?;
    Ok(Box::new(backend))
}
