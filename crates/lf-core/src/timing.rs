//! Opt-in wall-clock timing for tick runs.
//!
//! Off unless the `LF_TIMING` environment variable is set or
//! [`enable_timing`] was called. Disabled timers cost one `Instant::now()`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Turn timing on for the rest of the process.
pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var_os("LF_TIMING").is_some()
}

/// Measures one span. Reports nothing when timing is off.
pub struct Timer {
    label: &'static str,
    start: Instant,
    enabled: bool,
}

impl Timer {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
            enabled: is_enabled(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Time since start, if timing is on.
    pub fn elapsed(&self) -> Option<Duration> {
        self.enabled.then(|| self.start.elapsed())
    }

    /// Seconds since start, if timing is on.
    pub fn stop(self) -> Option<f64> {
        self.elapsed().map(|d| d.as_secs_f64())
    }
}

/// Running totals over many timed spans, typically one per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    total: Duration,
    max: Duration,
    count: u32,
}

impl TickStats {
    pub fn record(&mut self, span: Duration) {
        self.total += span;
        self.max = self.max.max(span);
        self.count += 1;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    /// Longest recorded span.
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Mean span, zero when nothing was recorded.
    pub fn mean(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total / self.count
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_stats_mean_and_max() {
        let mut stats = TickStats::default();
        assert_eq!(stats.mean(), Duration::ZERO);
        stats.record(Duration::from_micros(100));
        stats.record(Duration::from_micros(300));
        assert_eq!(stats.count(), 2);
        assert_eq!(stats.total(), Duration::from_micros(400));
        assert_eq!(stats.mean(), Duration::from_micros(200));
        assert_eq!(stats.max(), Duration::from_micros(300));
    }

    #[test]
    fn enabled_timer_reports_elapsed() {
        enable_timing();
        let timer = Timer::start("tick");
        assert_eq!(timer.label(), "tick");
        assert!(timer.elapsed().is_some());
        assert!(timer.stop().is_some());
    }
}
