//! Throughput statistics for benchmark iterations.
//!
//! Collects the elapsed time of each timed iteration for one queue variant
//! and turns it into the figures the report prints: fastest, slowest and
//! mean iteration, and items moved per second.

use std::time::Duration;

use spsc_common::variant::QueueKind;

/// Tracks iteration timings with minimal overhead.
///
/// Accumulates one measurement per iteration. Only summary values are kept,
/// so recording is constant time and allocation free.
#[derive(Debug, Clone)]
pub struct ThroughputStats {
    pub min: Duration,
    pub max: Duration,
    pub total: Duration,
    pub count: u32,
}

impl Default for ThroughputStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ThroughputStats {
    /// Creates an empty tracker.
    ///
    /// `min` starts at the largest representable duration so the first
    /// measurement becomes the minimum.
    pub fn new() -> Self {
        Self {
            min: Duration::MAX,
            max: Duration::ZERO,
            total: Duration::ZERO,
            count: 0,
        }
    }

    /// Records the elapsed time of one iteration.
    pub fn update(&mut self, elapsed: Duration) {
        self.min = self.min.min(elapsed);
        self.max = self.max.max(elapsed);
        self.total += elapsed;
        self.count += 1;
    }

    /// Mean iteration time, or zero if nothing was recorded.
    pub fn mean(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total / self.count
        }
    }

    /// Items moved per second over all recorded iterations.
    ///
    /// Returns 0.0 if nothing was recorded, so the figure is always finite.
    pub fn items_per_sec(&self, items_per_iteration: usize) -> f64 {
        let seconds = self.total.as_secs_f64();
        if self.count == 0 || seconds == 0.0 {
            0.0
        } else {
            (items_per_iteration as f64 * f64::from(self.count)) / seconds
        }
    }
}

/// Measured results for one variant.
#[derive(Debug, Clone)]
pub struct VariantReport {
    pub kind: QueueKind,
    pub items: usize,
    pub capacity: usize,
    pub stats: ThroughputStats,
}

/// Prints the result table for a finished run.
///
/// One row per variant with mean, fastest and slowest iteration and the
/// sustained throughput. Variants with a known capacity discrepancy are
/// marked so they are not read as a like-for-like comparison.
pub fn print_report(reports: &[VariantReport]) {
    println!("\nSPSC Queue Throughput");
    println!(
        "{:<14} {:>10} {:>12} {:>12} {:>12} {:>14}",
        "variant", "capacity", "mean", "min", "max", "items/s"
    );

    for report in reports {
        let stats = &report.stats;
        let marker = if report.kind.is_known_discrepancy() { " *" } else { "" };
        println!(
            "{:<14} {:>10} {:>12} {:>12} {:>12} {:>14.0}{}",
            report.kind.name(),
            report.capacity,
            format_duration(stats.mean()),
            format_duration(stats.min),
            format_duration(stats.max),
            stats.items_per_sec(report.items),
            marker
        );
    }

    if reports.iter().any(|report| report.kind.is_known_discrepancy()) {
        println!("* holds one element fewer than its configured capacity");
    }
}

/// Formats a duration in the largest unit that keeps it above one.
fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos() as f64;
    if nanos < 1_000.0 {
        format!("{:.2} ns", nanos)
    } else if nanos < 1_000_000.0 {
        format!("{:.2} us", nanos / 1_000.0)
    } else if nanos < 1_000_000_000.0 {
        format!("{:.2} ms", nanos / 1_000_000.0)
    } else {
        format!("{:.2} s", nanos / 1_000_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_are_finite() {
        let stats = ThroughputStats::new();
        assert_eq!(stats.mean(), Duration::ZERO);
        assert_eq!(stats.items_per_sec(500_000), 0.0);
    }

    #[test]
    fn tracks_extremes_and_mean() {
        let mut stats = ThroughputStats::new();
        stats.update(Duration::from_millis(30));
        stats.update(Duration::from_millis(10));
        stats.update(Duration::from_millis(20));

        assert_eq!(stats.min, Duration::from_millis(10));
        assert_eq!(stats.max, Duration::from_millis(30));
        assert_eq!(stats.mean(), Duration::from_millis(20));
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn throughput_counts_every_iteration() {
        let mut stats = ThroughputStats::new();
        stats.update(Duration::from_millis(500));
        stats.update(Duration::from_millis(500));

        let rate = stats.items_per_sec(1_000);
        assert!((rate - 2_000.0).abs() < 1e-9);
    }

    #[test]
    fn durations_pick_readable_units() {
        assert_eq!(format_duration(Duration::from_nanos(250)), "250.00 ns");
        assert_eq!(format_duration(Duration::from_micros(12)), "12.00 us");
        assert_eq!(format_duration(Duration::from_millis(3)), "3.00 ms");
        assert_eq!(format_duration(Duration::from_secs(2)), "2.00 s");
    }
}
