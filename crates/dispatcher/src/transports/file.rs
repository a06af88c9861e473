//! FileTransport - one JSONL stream per socket

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use tracing::{debug, error, warn};

use contracts::Transport;

use crate::metrics::{MetricsSnapshot, TransportMetrics};
use crate::transports::{read_record, PartEnvelope, SharedStore};

/// Configuration for FileTransport
#[derive(Debug, Clone)]
pub struct FileTransportConfig {
    /// Base output directory
    pub base_path: PathBuf,
    /// Number of socket streams
    pub sockets: usize,
}

impl FileTransportConfig {
    /// Create config from params map
    pub fn from_params(sockets: usize, params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output"));

        Self { base_path, sockets }
    }
}

/// Transport that appends one JSON envelope line per part, one file
/// per socket (`socket_<id>.jsonl` under the base directory)
pub struct FileTransport {
    name: String,
    writers: Vec<Mutex<File>>,
    store: SharedStore,
    cursor: AtomicI64,
    metrics: TransportMetrics,
}

impl FileTransport {
    /// Create a new FileTransport, creating the output directory and
    /// one stream file per socket
    pub fn new(
        name: impl Into<String>,
        config: FileTransportConfig,
        store: SharedStore,
    ) -> std::io::Result<Self> {
        fs::create_dir_all(&config.base_path)?;

        let mut writers = Vec::with_capacity(config.sockets);
        for socket_id in 0..config.sockets {
            let path = config.base_path.join(format!("socket_{socket_id}.jsonl"));
            writers.push(Mutex::new(File::create(path)?));
        }

        Ok(Self {
            name: name.into(),
            writers,
            store,
            cursor: AtomicI64::new(0),
            metrics: TransportMetrics::new(),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        sockets: usize,
        params: &HashMap<String, String>,
        store: SharedStore,
    ) -> std::io::Result<Self> {
        let config = FileTransportConfig::from_params(sockets, params);
        Self::new(name, config, store)
    }

    /// Get a snapshot of this transport's counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn write_envelope(&self, socket_id: usize, envelope: &PartEnvelope) -> std::io::Result<usize> {
        let writer = self.writers.get(socket_id).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no stream for socket {socket_id}"),
            )
        })?;

        let line = serde_json::to_string(envelope)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let mut file = writer
            .lock()
            .map_err(|_| std::io::Error::other("writer lock poisoned"))?;
        writeln!(file, "{line}")?;
        Ok(line.len() + 1)
    }
}

impl Transport for FileTransport {
    fn socket_count(&self) -> usize {
        self.writers.len()
    }

    fn current_index(&self) -> i64 {
        self.cursor.load(Ordering::SeqCst)
    }

    fn send_one(&self, socket_id: usize) {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);

        let payload = match read_record(&self.store, index) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    transport = %self.name,
                    part_index = index,
                    socket = socket_id,
                    error = %e,
                    "Part read failed"
                );
                self.metrics.inc_send_failures();
                return;
            }
        };

        let envelope = PartEnvelope {
            part_index: index,
            socket: socket_id,
            payload,
        };

        match self.write_envelope(socket_id, &envelope) {
            Ok(bytes) => {
                debug!(
                    transport = %self.name,
                    part_index = index,
                    socket = socket_id,
                    bytes,
                    "Part written"
                );
                self.metrics.inc_parts_sent();
                self.metrics.add_bytes_sent(bytes as u64);
            }
            Err(e) => {
                error!(
                    transport = %self.name,
                    part_index = index,
                    socket = socket_id,
                    error = %e,
                    "Part write failed"
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
    use tempfile::tempdir;

    fn transport_over(
        records: usize,
        sockets: usize,
    ) -> (FileTransport, tempfile::TempDir, tempfile::NamedTempFile) {
        let dir = tempdir().unwrap();
        let (store, file) = numbered_store(records);
        let config = FileTransportConfig {
            base_path: dir.path().to_path_buf(),
            sockets,
        };
        let transport = FileTransport::new("file", config, store).unwrap();
        (transport, dir, file)
    }

    #[test]
    fn test_creates_one_stream_per_socket() {
        let (transport, dir, _fixture) = transport_over(4, 3);
        assert_eq!(transport.socket_count(), 3);
        for socket_id in 0..3 {
            assert!(dir.path().join(format!("socket_{socket_id}.jsonl")).exists());
        }
    }

    #[test]
    fn test_envelopes_land_in_cursor_order() {
        let (transport, dir, _fixture) = transport_over(6, 2);

        for _ in 0..3 {
            transport.send_one(0);
        }
        for _ in 0..3 {
            transport.send_one(1);
        }

        let content = fs::read_to_string(dir.path().join("socket_0.jsonl")).unwrap();
        let envelopes: Vec<PartEnvelope> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(envelopes.len(), 3);
        for (i, envelope) in envelopes.iter().enumerate() {
            assert_eq!(envelope.part_index, i as i64);
            assert_eq!(envelope.socket, 0);
            assert_eq!(envelope.payload, serde_json::json!(i));
        }

        assert_eq!(transport.current_index(), 6);
        assert_eq!(transport.metrics().parts_sent, 6);
    }

    #[test]
    fn test_unknown_socket_counts_failure() {
        let (transport, _dir, _fixture) = transport_over(2, 1);
        transport.send_one(5);
        assert_eq!(transport.metrics().send_failures, 1);
        // Cursor advanced anyway
        assert_eq!(transport.current_index(), 1);
    }
}
