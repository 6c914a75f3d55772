use std::collections::BTreeMap;

use serde::Deserialize;
use wmi::{COMLibrary, WMIConnection};

use crate::core::engine::numeric::round1;
use crate::core::engine::{TemperatureBackend, TemperatureReading};
use crate::error::{GlanceError, Result};

/// Windows sensor backend over the OpenHardwareMonitor WMI namespace.
///
/// Only populated when OpenHardwareMonitor (or a compatible publisher) is
/// running; probing fails otherwise and the chain records the backend as
/// disabled. The WMI connection is held for the backend's lifetime and
/// released on drop.
pub struct WmiSensorBackend {
    connection: WMIConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TemperatureSensorRow {
    name: String,
    value: Option<f32>,
    max: Option<f32>,
    min: Option<f32>,
}

impl WmiSensorBackend {
    pub fn probe() -> Result<Self> {
        let com = COMLibrary::new().map_err(|e| {
            GlanceError::source_unavailable(format!("COM initialization failed: {}", e))
        })?;

        let connection = WMIConnection::with_namespace_path("root\\OpenHardwareMonitor", com)
            .map_err(|e| {
                GlanceError::source_unavailable(format!(
                    "OpenHardwareMonitor namespace not available: {}",
                    e
                ))
            })?;

        Ok(Self { connection })
    }
}

impl TemperatureBackend for WmiSensorBackend {
    fn label(&self) -> &'static str {
        "wmi"
    }

    fn read(&mut self) -> Result<BTreeMap<String, TemperatureReading>> {
        let rows: Vec<TemperatureSensorRow> = self
            .connection
            .raw_query("SELECT Name, Value, Max, Min FROM Sensor WHERE SensorType = 'Temperature'")
            .map_err(|e| GlanceError::source_query_failed(format!("WMI sensor query: {}", e)))?;

        let mut readings = BTreeMap::new();
        for row in rows {
            let Some(value) = row.value else {
                continue;
            };

            readings.insert(
                row.name,
                TemperatureReading {
                    value: round1(value as f64),
                    max: row.max.map(f64::from),
                    min: row.min.map(f64::from),
                },
            );
        }

        Ok(readings)
    }
}
