use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::engine::numeric::coerce_f64;
use crate::core::engine::{FallbackMetric, GpuFallback};
use crate::error::{GlanceError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// External `nvidia-smi` fallback, scoped per device.
///
/// Each query is a bounded subprocess invocation: the child is polled with
/// `try_wait` against a hard deadline and killed on expiry, so one stuck
/// device can never block the whole collection.
pub struct SmiFallback {
    binary: Option<PathBuf>,
    timeout: Duration,
}

impl SmiFallback {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let binary = which::which("nvidia-smi").ok();
        if binary.is_none() {
            log::info!("nvidia-smi not found, GPU fallback queries disabled");
        }
        Self { binary, timeout }
    }
}

impl Default for SmiFallback {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuFallback for SmiFallback {
    fn available(&self) -> bool {
        self.binary.is_some()
    }

    fn query(&self, device: u32, metric: FallbackMetric) -> Result<f64> {
        let binary = self
            .binary
            .as_ref()
            .ok_or_else(|| GlanceError::source_unavailable("nvidia-smi not installed"))?;

        let mut child = Command::new(binary)
            .arg(format!("--query-gpu={}", metric.query_field()))
            .arg("--format=csv,noheader,nounits")
            .arg("-i")
            .arg(device.to_string())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .stdin(Stdio::null())
            .spawn()?;

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait()? {
                Some(status) => {
                    if !status.success() {
                        return Err(GlanceError::source_query_failed(format!(
                            "nvidia-smi exited with {} for device {}",
                            status, device
                        )));
                    }

                    let mut stdout = String::new();
                    if let Some(mut pipe) = child.stdout.take() {
                        pipe.read_to_string(&mut stdout)?;
                    }

                    let line = stdout
                        .lines()
                        .next()
                        .ok_or_else(|| GlanceError::parse("empty nvidia-smi output"))?;

                    return match metric {
                        // Unknown utilization defaults to zero, so garbage
                        // like "[Not Supported]" coerces instead of failing.
                        FallbackMetric::Utilization => Ok(coerce_f64(Some(line))),
                        FallbackMetric::Temperature => {
                            line.trim().parse::<f64>().map_err(|_| {
                                GlanceError::parse(format!(
                                    "unexpected nvidia-smi output: {:?}",
                                    line
                                ))
                            })
                        }
                    };
                }
                None => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(GlanceError::timeout(format!(
                            "nvidia-smi query for device {} exceeded {:?}",
                            device, self.timeout
                        )));
                    }
                    thread::sleep(POLL_INTERVAL);
                }
            }
        }
    }
}
