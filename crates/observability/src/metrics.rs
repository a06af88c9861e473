//! Dispatch metric collection
//!
//! Records per-cycle dispatch metrics and aggregates an in-memory summary
//! for the end-of-run report.

use metrics::{counter, gauge, histogram};

/// Record one completed dispatch cycle
///
/// Call once per `dispatch` invocation.
pub fn record_cycle(cycle: u64, served_sockets: usize, parts_sent: u64) {
    counter!("partcast_cycles_total").increment(1);
    gauge!("partcast_last_cycle").set(cycle as f64);
    gauge!("partcast_sockets_served").set(served_sockets as f64);
    if parts_sent > 0 {
        counter!("partcast_parts_sent_total").increment(parts_sent);
    }
    histogram!("partcast_parts_per_cycle").record(parts_sent as f64);
}

/// Record one part handed to a transport socket
pub fn record_part_sent(transport: &str, socket_id: usize) {
    counter!(
        "partcast_parts_total",
        "transport" => transport.to_string(),
        "socket" => socket_id.to_string()
    )
    .increment(1);
}

/// Record a socket skipped because no whole group remained
pub fn record_socket_skipped(transport: &str) {
    counter!(
        "partcast_sockets_skipped_total",
        "transport" => transport.to_string()
    )
    .increment(1);
}

/// Record the transport cursor after a cycle
pub fn record_cursor_position(position: i64) {
    gauge!("partcast_cursor_position").set(position as f64);
}

/// Record the wall time one cycle took
pub fn record_cycle_duration_ms(duration_ms: f64) {
    histogram!("partcast_cycle_duration_ms").record(duration_ms);
}

/// In-memory dispatch metric aggregator
///
/// Aggregates per-cycle observations for the final run summary.
#[derive(Debug, Clone, Default)]
pub struct DispatchMetricsAggregator {
    /// Total cycles observed
    pub total_cycles: u64,

    /// Total parts sent across all cycles
    pub total_parts: u64,

    /// Total socket skips (no whole group remained)
    pub total_skipped: u64,

    /// Parts-per-cycle statistics
    pub parts_stats: RunningStats,

    /// Cycle duration statistics (ms)
    pub duration_stats: RunningStats,
}

impl DispatchMetricsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one cycle's observations
    pub fn update(&mut self, parts_sent: u64, sockets_skipped: u64, duration_ms: f64) {
        self.total_cycles += 1;
        self.total_parts += parts_sent;
        self.total_skipped += sockets_skipped;
        self.parts_stats.push(parts_sent as f64);
        self.duration_stats.push(duration_ms);
    }

    /// Produce the summary report
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_cycles: self.total_cycles,
            total_parts: self.total_parts,
            total_skipped: self.total_skipped,
            parts_per_cycle: StatsSummary::from(&self.parts_stats),
            cycle_duration_ms: StatsSummary::from(&self.duration_stats),
        }
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Dispatch metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_cycles: u64,
    pub total_parts: u64,
    pub total_skipped: u64,
    pub parts_per_cycle: StatsSummary,
    pub cycle_duration_ms: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Dispatch Metrics Summary ===")?;
        writeln!(f, "Total cycles: {}", self.total_cycles)?;
        writeln!(f, "Total parts sent: {}", self.total_parts)?;
        writeln!(f, "Socket skips: {}", self.total_skipped)?;
        writeln!(f, "Parts per cycle: {}", self.parts_per_cycle)?;
        writeln!(f, "Cycle duration (ms): {}", self.cycle_duration_ms)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new observation
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum
    pub fn max(&self) -> f64 {
        self.max
    }
}
