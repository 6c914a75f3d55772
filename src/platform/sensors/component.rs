use std::collections::BTreeMap;

use sysinfo::Components;

use crate::core::engine::numeric::round1;
use crate::core::engine::{TemperatureBackend, TemperatureReading};
use crate::error::Result;

/// Generic cross-platform sensor backend over sysinfo's component list.
///
/// Always constructible; hosts without sensors simply contribute an empty
/// map. The component list is refreshed in place on every read.
pub struct ComponentBackend {
    components: Components,
}

impl ComponentBackend {
    pub fn new() -> Self {
        Self {
            components: Components::new_with_refreshed_list(),
        }
    }
}

impl Default for ComponentBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureBackend for ComponentBackend {
    fn label(&self) -> &'static str {
        "sysinfo"
    }

    fn read(&mut self) -> Result<BTreeMap<String, TemperatureReading>> {
        self.components.refresh(true);

        let mut readings = BTreeMap::new();
        for component in self.components.iter() {
            let Some(value) = component.temperature() else {
                continue;
            };

            readings.insert(
                component.label().to_string(),
                TemperatureReading {
                    value: round1(value as f64),
                    max: component.max().map(f64::from),
                    min: None,
                },
            );
        }

        Ok(readings)
    }
}
