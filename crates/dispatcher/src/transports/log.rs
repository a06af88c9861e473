//! LogTransport - logs each part via tracing

use std::sync::atomic::{AtomicI64, Ordering};

use tracing::{info, warn};

use contracts::Transport;

use crate::metrics::{MetricsSnapshot, TransportMetrics};
use crate::transports::{read_record, SharedStore};

/// Transport that logs part summaries instead of sending them anywhere
///
/// Used by dry runs and tests. Socket count is fixed at construction.
pub struct LogTransport {
    name: String,
    sockets: usize,
    store: SharedStore,
    cursor: AtomicI64,
    metrics: TransportMetrics,
}

impl LogTransport {
    /// Create a new LogTransport with a fixed socket count
    pub fn new(name: impl Into<String>, sockets: usize, store: SharedStore) -> Self {
        Self {
            name: name.into(),
            sockets,
            store,
            cursor: AtomicI64::new(0),
            metrics: TransportMetrics::new(),
        }
    }

    /// Get a snapshot of this transport's counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Transport for LogTransport {
    fn socket_count(&self) -> usize {
        self.sockets
    }

    fn current_index(&self) -> i64 {
        self.cursor.load(Ordering::SeqCst)
    }

    fn send_one(&self, socket_id: usize) {
        // A failed read still advances the cursor so one bad slot
        // cannot wedge the stream.
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);

        match read_record(&self.store, index) {
            Ok(payload) => {
                info!(
                    transport = %self.name,
                    part_index = index,
                    socket = socket_id,
                    payload = %payload,
                    "Part dispatched"
                );
                self.metrics.inc_parts_sent();
            }
            Err(e) => {
                warn!(
                    transport = %self.name,
                    part_index = index,
                    socket = socket_id,
                    error = %e,
                    "Part read failed"
                );
                self.metrics.inc_send_failures();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transports::test_support::numbered_store;

    #[test]
    fn test_send_advances_cursor() {
        let (store, _file) = numbered_store(5);
        let transport = LogTransport::new("log", 2, store);

        assert_eq!(transport.current_index(), 0);
        transport.send_one(0);
        transport.send_one(1);
        assert_eq!(transport.current_index(), 2);
        assert_eq!(transport.metrics().parts_sent, 2);
    }

    #[test]
    fn test_read_past_end_counts_failure_but_advances() {
        let (store, _file) = numbered_store(1);
        let transport = LogTransport::new("log", 1, store);

        transport.send_one(0);
        transport.send_one(0);

        assert_eq!(transport.current_index(), 2);
        let snapshot = transport.metrics();
        assert_eq!(snapshot.parts_sent, 1);
        assert_eq!(snapshot.send_failures, 1);
    }
}
