//! Temperature provider chain.
//!
//! Merges readings from a generic cross-platform backend and an optional
//! platform-specific backend into one name-keyed map. The platform backend
//! is queried last so its richer per-sensor max/min bounds win on
//! conflicting names.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::platform::sensors;

use super::metrics::TemperatureReading;

/// One concrete source of temperature readings.
///
/// Implementations live in the platform layer. A backend holds whatever
/// native handle it needs (sysinfo component list, WMI connection) for the
/// chain's lifetime; the handle is released when the chain is dropped.
/// Backends may be thread-confined (COM handles are): the chain lives and
/// dies on the thread that constructed the engine.
pub trait TemperatureBackend {
    /// Short identifier used in log messages.
    fn label(&self) -> &'static str;

    /// Read all sensors currently visible to this backend.
    ///
    /// Values must be rounded to one decimal place before being returned.
    fn read(&mut self) -> Result<BTreeMap<String, TemperatureReading>>;
}

/// Priority-ordered chain of temperature backends.
///
/// Constructed once at engine startup; unavailable backends are recorded as
/// disabled (logged at info) rather than failing construction.
pub struct TemperatureChain {
    backends: Vec<Box<dyn TemperatureBackend>>,
}

impl TemperatureChain {
    /// Probe the platform and assemble the chain: generic backend first,
    /// then the platform-specific one when it is usable.
    pub fn new() -> Self {
        let mut backends: Vec<Box<dyn TemperatureBackend>> = Vec::new();

        backends.push(Box::new(sensors::ComponentBackend::new()));

        match sensors::platform_backend() {
            Ok(Some(backend)) => backends.push(backend),
            Ok(None) => {}
            Err(e) => log::info!("platform sensor backend disabled: {}", e),
        }

        Self { backends }
    }

    /// Build a chain from explicit backends, in query order.
    pub fn with_backends(backends: Vec<Box<dyn TemperatureBackend>>) -> Self {
        Self { backends }
    }

    /// Query every backend in order and merge into one map.
    ///
    /// A later backend's entry replaces an earlier one with the same sensor
    /// name. A failed backend contributes nothing and never aborts the
    /// merge.
    pub fn read_all(&mut self) -> BTreeMap<String, TemperatureReading> {
        let mut merged = BTreeMap::new();

        for backend in &mut self.backends {
            match backend.read() {
                Ok(readings) => merged.extend(readings),
                Err(e) => log::debug!("{} temperature query failed: {}", backend.label(), e),
            }
        }

        merged
    }
}

impl Default for TemperatureChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GlanceError;

    struct FakeBackend {
        label: &'static str,
        readings: Result<Vec<(&'static str, f64, Option<f64>)>>,
    }

    impl TemperatureBackend for FakeBackend {
        fn label(&self) -> &'static str {
            self.label
        }

        fn read(&mut self) -> Result<BTreeMap<String, TemperatureReading>> {
            match &self.readings {
                Ok(entries) => Ok(entries
                    .iter()
                    .map(|(name, value, max)| {
                        (
                            name.to_string(),
                            TemperatureReading {
                                value: *value,
                                max: *max,
                                min: None,
                            },
                        )
                    })
                    .collect()),
                Err(_) => Err(GlanceError::source_query_failed("injected failure")),
            }
        }
    }

    #[test]
    fn test_platform_backend_wins_on_conflict() {
        let generic = FakeBackend {
            label: "generic",
            readings: Ok(vec![("core0", 40.0, None)]),
        };
        let platform = FakeBackend {
            label: "platform",
            readings: Ok(vec![("core0", 42.5, Some(95.0)), ("core1", 39.0, Some(95.0))]),
        };

        let mut chain = TemperatureChain::with_backends(vec![Box::new(generic), Box::new(platform)]);
        let merged = chain.read_all();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged["core0"].value, 42.5);
        assert_eq!(merged["core0"].max, Some(95.0));
        assert_eq!(merged["core1"].value, 39.0);
    }

    #[test]
    fn test_failed_backend_does_not_abort_merge() {
        let broken = FakeBackend {
            label: "broken",
            readings: Err(GlanceError::source_query_failed("gone")),
        };
        let working = FakeBackend {
            label: "working",
            readings: Ok(vec![("acpitz_temp1", 55.0, None)]),
        };

        let mut chain = TemperatureChain::with_backends(vec![Box::new(broken), Box::new(working)]);
        let merged = chain.read_all();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged["acpitz_temp1"].value, 55.0);
    }

    #[test]
    fn test_empty_chain_yields_empty_map() {
        let mut chain = TemperatureChain::with_backends(Vec::new());
        assert!(chain.read_all().is_empty());
    }

    #[test]
    fn test_thread_confined_backend_is_accepted() {
        use std::rc::Rc;

        // COM-backed sensor handles are confined to their thread; the
        // chain must accept a backend that is not Send.
        struct ConfinedBackend {
            readings: Rc<Vec<(&'static str, f64)>>,
        }

        impl TemperatureBackend for ConfinedBackend {
            fn label(&self) -> &'static str {
                "confined"
            }

            fn read(&mut self) -> Result<BTreeMap<String, TemperatureReading>> {
                Ok(self
                    .readings
                    .iter()
                    .map(|(name, value)| {
                        (
                            name.to_string(),
                            TemperatureReading {
                                value: *value,
                                max: None,
                                min: None,
                            },
                        )
                    })
                    .collect())
            }
        }

        let backend = ConfinedBackend {
            readings: Rc::new(vec![("core0", 40.0)]),
        };
        let mut chain = TemperatureChain::with_backends(vec![Box::new(backend)]);
        assert_eq!(chain.read_all()["core0"].value, 40.0);
    }
}
