//! Network throughput sampling.
//!
//! Converts monotonically increasing byte counters into an instantaneous
//! rate by diffing against the previous poll. The previous sample is the
//! only state carried across polls.

use parking_lot::Mutex;

use super::metrics::{NetworkCounters, NetworkRate};

/// Stateful sampler owned by one long-lived engine instance.
///
/// The baseline read-modify-write is guarded by a mutex so that callers
/// polling from multiple threads cannot lose an update and corrupt the next
/// rate computation.
#[derive(Debug, Default)]
pub struct NetworkRateSampler {
    last: Mutex<Option<NetworkCounters>>,
}

impl NetworkRateSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the rate between `current` and the stored baseline.
    ///
    /// The first call after startup stores `current` as the baseline and
    /// reports zero rates (no history to diff against). When the clock has
    /// not advanced since the baseline, zero rates are returned and the
    /// baseline is left untouched, so a later well-formed sample still
    /// diffs against real history. A counter reset (interface restart)
    /// yields a negative rate rather than a panic; callers may clamp.
    pub fn sample(&self, current: NetworkCounters) -> NetworkRate {
        let mut last = self.last.lock();

        let prev = match *last {
            Some(prev) => prev,
            None => {
                *last = Some(current);
                return NetworkRate::default();
            }
        };

        let elapsed = current.timestamp_secs - prev.timestamp_secs;
        if elapsed <= 0.0 {
            log::debug!("clock did not advance between polls, skipping rate update");
            return NetworkRate::default();
        }

        let upload = delta(current.bytes_sent, prev.bytes_sent) / elapsed;
        let download = delta(current.bytes_recv, prev.bytes_recv) / elapsed;
        *last = Some(current);

        NetworkRate {
            upload_bytes_per_sec: upload,
            download_bytes_per_sec: download,
        }
    }
}

fn delta(current: u64, previous: u64) -> f64 {
    current as f64 - previous as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(sent: u64, recv: u64, t: f64) -> NetworkCounters {
        NetworkCounters {
            bytes_sent: sent,
            bytes_recv: recv,
            timestamp_secs: t,
        }
    }

    #[test]
    fn test_first_sample_reports_zero() {
        let sampler = NetworkRateSampler::new();
        let rate = sampler.sample(counters(123_456, 789_000, 10.0));
        assert_eq!(rate, NetworkRate::default());
    }

    #[test]
    fn test_rate_from_consecutive_samples() {
        let sampler = NetworkRateSampler::new();
        sampler.sample(counters(1000, 2000, 0.0));
        let rate = sampler.sample(counters(1500, 2200, 2.0));
        assert_eq!(rate.upload_bytes_per_sec, 250.0);
        assert_eq!(rate.download_bytes_per_sec, 100.0);
    }

    #[test]
    fn test_non_advancing_clock_preserves_baseline() {
        let sampler = NetworkRateSampler::new();
        sampler.sample(counters(1000, 2000, 0.0));

        // Same timestamp: no division, no baseline update.
        let stale = sampler.sample(counters(9999, 9999, 0.0));
        assert_eq!(stale, NetworkRate::default());

        // Clock going backwards is treated the same way.
        let backwards = sampler.sample(counters(9999, 9999, -1.0));
        assert_eq!(backwards, NetworkRate::default());

        // The third call still diffs against the original baseline, as if
        // the stale samples never happened.
        let rate = sampler.sample(counters(1500, 2200, 2.0));
        assert_eq!(rate.upload_bytes_per_sec, 250.0);
        assert_eq!(rate.download_bytes_per_sec, 100.0);
    }

    #[test]
    fn test_counter_wraparound_surfaces_negative_rate() {
        let sampler = NetworkRateSampler::new();
        sampler.sample(counters(10_000, 20_000, 0.0));
        let rate = sampler.sample(counters(400, 500, 2.0));
        assert_eq!(rate.upload_bytes_per_sec, -4800.0);
        assert_eq!(rate.download_bytes_per_sec, -9750.0);
    }

    #[test]
    fn test_baseline_advances_after_successful_sample() {
        let sampler = NetworkRateSampler::new();
        sampler.sample(counters(0, 0, 0.0));
        sampler.sample(counters(100, 100, 1.0));
        let rate = sampler.sample(counters(400, 250, 4.0));
        assert_eq!(rate.upload_bytes_per_sec, 100.0);
        assert_eq!(rate.download_bytes_per_sec, 50.0);
    }
}
