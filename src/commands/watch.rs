use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::ArgMatches;

use crate::core::engine::HardwareEngine;

use super::snapshot::render;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let interval_secs = clamp_interval(matches.get_one::<u64>("interval").copied().unwrap_or(2));
    let json = matches.get_flag("json");

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))?;

    let mut engine = HardwareEngine::new();

    while running.load(Ordering::SeqCst) {
        let snapshot = engine.snapshot();

        if json {
            // One JSON document per line, for piping.
            println!("{}", serde_json::to_string(&snapshot)?);
        } else {
            render(&snapshot);
            println!();
        }

        // Sleep in short slices so Ctrl-C stays responsive.
        for _ in 0..interval_secs * 10 {
            if !running.load(Ordering::SeqCst) {
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }
    }

    Ok(())
}

/// The CLI parser already rejects 0, but the poll loop must never spin
/// without sleeping regardless of where the interval came from.
fn clamp_interval(secs: u64) -> u64 {
    secs.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_is_clamped_to_one() {
        assert_eq!(clamp_interval(0), 1);
    }

    #[test]
    fn test_positive_interval_passes_through() {
        assert_eq!(clamp_interval(2), 2);
        assert_eq!(clamp_interval(30), 30);
    }
}
