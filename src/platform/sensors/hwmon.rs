use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::engine::numeric::round1;
use crate::core::engine::{TemperatureBackend, TemperatureReading};
use crate::error::{GlanceError, Result};

/// Linux hwmon sensor backend.
///
/// Reads `/sys/class/hwmon` directly, which exposes per-sensor max/min
/// bounds the generic backend lacks. Sensor keys are `{chip}_{label}`, so
/// entries from this backend line up with (and override) same-named chips
/// reported generically.
pub struct HwmonBackend {
    root: PathBuf,
}

impl HwmonBackend {
    /// Open the hwmon tree, failing when it is absent or holds no chips.
    pub fn probe() -> Result<Self> {
        Self::probe_at(Path::new("/sys/class/hwmon"))
    }

    pub(crate) fn probe_at(root: &Path) -> Result<Self> {
        let entries = fs::read_dir(root).map_err(|e| {
            GlanceError::source_unavailable(format!("hwmon tree not readable: {}", e))
        })?;

        if entries.count() == 0 {
            return Err(GlanceError::source_unavailable("no hwmon chips present"));
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }
}

impl TemperatureBackend for HwmonBackend {
    fn label(&self) -> &'static str {
        "hwmon"
    }

    fn read(&mut self) -> Result<BTreeMap<String, TemperatureReading>> {
        let chips = fs::read_dir(&self.root).map_err(|e| {
            GlanceError::source_query_failed(format!("hwmon tree vanished: {}", e))
        })?;

        let mut readings = BTreeMap::new();
        for chip in chips.flatten() {
            read_chip(&chip.path(), &mut readings);
        }

        Ok(readings)
    }
}

fn read_chip(chip_dir: &Path, readings: &mut BTreeMap<String, TemperatureReading>) {
    let chip_name = read_trimmed(&chip_dir.join("name"))
        .unwrap_or_else(|| chip_dir.file_name().unwrap_or_default().to_string_lossy().into_owned());

    let Ok(entries) = fs::read_dir(chip_dir) else {
        return;
    };

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();

        // Sensors appear as temp<N>_input with optional siblings
        // temp<N>_label, temp<N>_max, temp<N>_min.
        let Some(sensor) = file_name.strip_suffix("_input") else {
            continue;
        };
        if !sensor.starts_with("temp") {
            continue;
        }

        let Some(value) = read_millidegrees(&entry.path()) else {
            continue;
        };

        let label = read_trimmed(&chip_dir.join(format!("{}_label", sensor)))
            .unwrap_or_else(|| sensor.to_string());

        readings.insert(
            format!("{}_{}", chip_name, label),
            TemperatureReading {
                value: round1(value),
                max: read_millidegrees(&chip_dir.join(format!("{}_max", sensor))),
                min: read_millidegrees(&chip_dir.join(format!("{}_min", sensor))),
            },
        );
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    let raw = fs::read_to_string(path).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// hwmon reports temperatures in millidegrees Celsius.
fn read_millidegrees(path: &Path) -> Option<f64> {
    read_trimmed(path)?.parse::<f64>().ok().map(|v| v / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fake_chip(root: &Path, dir: &str, files: &[(&str, &str)]) {
        let chip = root.join(dir);
        fs::create_dir_all(&chip).unwrap();
        for (name, contents) in files {
            fs::write(chip.join(name), contents).unwrap();
        }
    }

    #[test]
    fn test_probe_fails_on_missing_tree() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("hwmon");
        assert!(HwmonBackend::probe_at(&missing).is_err());
    }

    #[test]
    fn test_probe_fails_on_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        assert!(HwmonBackend::probe_at(dir.path()).is_err());
    }

    #[test]
    fn test_reads_labeled_sensors_with_bounds() {
        let dir = tempfile::tempdir().unwrap();
        fake_chip(
            dir.path(),
            "hwmon0",
            &[
                ("name", "coretemp\n"),
                ("temp1_input", "42525\n"),
                ("temp1_label", "Core 0\n"),
                ("temp1_max", "95000\n"),
                ("temp1_min", "0\n"),
            ],
        );

        let mut backend = HwmonBackend::probe_at(dir.path()).unwrap();
        let readings = backend.read().unwrap();

        let reading = &readings["coretemp_Core 0"];
        assert_eq!(reading.value, 42.5);
        assert_eq!(reading.max, Some(95.0));
        assert_eq!(reading.min, Some(0.0));
    }

    #[test]
    fn test_unlabeled_sensor_uses_index_name() {
        let dir = tempfile::tempdir().unwrap();
        fake_chip(
            dir.path(),
            "hwmon1",
            &[("name", "acpitz"), ("temp1_input", "55000")],
        );

        let mut backend = HwmonBackend::probe_at(dir.path()).unwrap();
        let readings = backend.read().unwrap();

        let reading = &readings["acpitz_temp1"];
        assert_eq!(reading.value, 55.0);
        assert_eq!(reading.max, None);
        assert_eq!(reading.min, None);
    }

    #[test]
    fn test_garbage_sensor_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fake_chip(
            dir.path(),
            "hwmon2",
            &[("name", "weird"), ("temp1_input", "not-a-number")],
        );

        let mut backend = HwmonBackend::probe_at(dir.path()).unwrap();
        assert!(backend.read().unwrap().is_empty());
    }
}
