//! Per-transport metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single transport, shared across send calls
#[derive(Debug, Default)]
pub struct TransportMetrics {
    /// Total parts handed to the wire
    parts_sent: AtomicU64,
    /// Total send attempts that failed (read, encode, or write)
    send_failures: AtomicU64,
    /// Total payload bytes written
    bytes_sent: AtomicU64,
}

impl TransportMetrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total parts sent
    pub fn parts_sent(&self) -> u64 {
        self.parts_sent.load(Ordering::Relaxed)
    }

    /// Increment parts sent
    pub fn inc_parts_sent(&self) {
        self.parts_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Get send failure count
    pub fn send_failures(&self) -> u64 {
        self.send_failures.load(Ordering::Relaxed)
    }

    /// Increment send failure count
    pub fn inc_send_failures(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total bytes sent
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }

    /// Add to bytes sent
    pub fn add_bytes_sent(&self, bytes: u64) {
        self.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            parts_sent: self.parts_sent(),
            send_failures: self.send_failures(),
            bytes_sent: self.bytes_sent(),
        }
    }
}

/// Snapshot of transport metrics (for reporting)
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub parts_sent: u64,
    pub send_failures: u64,
    pub bytes_sent: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let metrics = TransportMetrics::new();
        metrics.inc_parts_sent();
        metrics.inc_parts_sent();
        metrics.inc_send_failures();
        metrics.add_bytes_sent(128);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.parts_sent, 2);
        assert_eq!(snapshot.send_failures, 1);
        assert_eq!(snapshot.bytes_sent, 128);
    }
}
