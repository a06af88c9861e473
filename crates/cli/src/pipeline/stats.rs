//! Pipeline statistics and metrics.

use std::time::Duration;

use observability::DispatchMetricsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total dispatch cycles run
    pub cycles_run: u64,

    /// Total parts sent across all sockets
    pub parts_sent: u64,

    /// Record count of the opened store
    pub records_total: i64,

    /// Transport cursor when the pipeline stopped
    pub final_cursor: i64,

    /// Records per group per socket
    pub group_size: usize,

    /// Number of output sockets
    pub socket_count: usize,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Dispatch metrics aggregator
    pub dispatch_metrics: DispatchMetricsAggregator,
}

impl PipelineStats {
    /// Calculate parts per second throughput
    pub fn pps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.parts_sent as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Pipeline Statistics ===\n");
        println!("Duration: {:.2}s", self.duration.as_secs_f64());
        println!("Cycles run: {}", self.cycles_run);
        println!("Parts sent: {}", self.parts_sent);
        println!("Parts/sec: {:.2}", self.pps());
        println!("Cursor: {}/{}", self.final_cursor, self.records_total);
        println!(
            "Sockets: {}, group size: {}",
            self.socket_count, self.group_size
        );

        println!("\n{}", self.dispatch_metrics.summary());
    }
}
