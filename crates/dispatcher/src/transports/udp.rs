//! UdpTransport - fire-and-forget datagram streaming

use std::collections::HashMap;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicI64, Ordering};

use tracing::{debug, error, warn};

use contracts::Transport;

use crate::metrics::{MetricsSnapshot, TransportMetrics};
use crate::transports::{read_record, PartEnvelope, SharedStore};

/// Serialization format for datagram payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    /// JSON (human-readable, larger)
    #[default]
    Json,
    /// Bincode (binary, compact)
    Bincode,
}

/// Configuration for UdpTransport
#[derive(Debug, Clone)]
pub struct UdpTransportConfig {
    /// One target address per socket
    pub targets: Vec<SocketAddr>,
    /// Serialization format
    pub format: WireFormat,
    /// Max datagram size (UDP typically 65507 for IPv4)
    pub max_packet_size: usize,
}

impl UdpTransportConfig {
    /// Create config from params map
    ///
    /// `targets` is a comma-separated address list; socket count follows
    /// from its length.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let targets_str = params
            .get("targets")
            .ok_or_else(|| "missing 'targets' parameter".to_string())?;

        let mut targets = Vec::new();
        for part in targets_str.split(',') {
            let part = part.trim();
            let addr: SocketAddr = part
                .parse()
                .map_err(|e| format!("invalid address '{part}': {e}"))?;
            targets.push(addr);
        }
        if targets.is_empty() {
            return Err("'targets' parameter is empty".to_string());
        }

        let format = match params.get("format").map(String::as_str) {
            Some("bincode") => WireFormat::Bincode,
            Some("json") | None => WireFormat::Json,
            Some(other) => return Err(format!("unknown format '{other}'")),
        };

        let max_packet_size = params
            .get("max_packet_size")
            .and_then(|s| s.parse().ok())
            .unwrap_or(65000);

        Ok(Self {
            targets,
            format,
            max_packet_size,
        })
    }
}

/// Transport that sends each part as one datagram, one connected socket
/// per configured target
pub struct UdpTransport {
    name: String,
    config: UdpTransportConfig,
    sockets: Vec<UdpSocket>,
    store: SharedStore,
    cursor: AtomicI64,
    metrics: TransportMetrics,
}

impl UdpTransport {
    /// Create a new UdpTransport, binding one socket per target
    pub fn new(
        name: impl Into<String>,
        config: UdpTransportConfig,
        store: SharedStore,
    ) -> std::io::Result<Self> {
        let name = name.into();

        let mut sockets = Vec::with_capacity(config.targets.len());
        for target in &config.targets {
            let socket = UdpSocket::bind("0.0.0.0:0")?;
            socket.connect(target)?;
            sockets.push(socket);
        }

        debug!(
            transport = %name,
            targets = config.targets.len(),
            "UdpTransport connected"
        );

        Ok(Self {
            name,
            config,
            sockets,
            store,
            cursor: AtomicI64::new(0),
            metrics: TransportMetrics::new(),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
        store: SharedStore,
    ) -> Result<Self, String> {
        let config = UdpTransportConfig::from_params(params)?;
        Self::new(name, config, store).map_err(|e| e.to_string())
    }

    /// Get a snapshot of this transport's counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn serialize_envelope(&self, envelope: &PartEnvelope) -> Result<Vec<u8>, String> {
        match self.config.format {
            WireFormat::Json => {
                serde_json::to_vec(envelope).map_err(|e| format!("json error: {e}"))
            }
            WireFormat::Bincode => {
                bincode::serialize(envelope).map_err(|e| format!("bincode error: {e}"))
            }
        }
    }

    fn transmit(&self, socket_id: usize, index: i64, data: &[u8]) {
        let Some(socket) = self.sockets.get(socket_id) else {
            warn!(transport = %self.name, socket = socket_id, "No socket for id");
            self.metrics.inc_send_failures();
            return;
        };

        if data.len() > self.config.max_packet_size {
            warn!(
                transport = %self.name,
                part_index = index,
                size = data.len(),
                max = self.config.max_packet_size,
                "Datagram exceeds max size"
            );
        }

        match socket.send(data) {
            Ok(sent) => {
                debug!(
                    transport = %self.name,
                    part_index = index,
                    socket = socket_id,
                    bytes = sent,
                    "Part sent"
                );
                self.metrics.inc_parts_sent();
                self.metrics.add_bytes_sent(sent as u64);
            }
            Err(e) => {
                // Log but don't fail, datagrams are best-effort
                error!(transport = %self.name, error = %e, "UDP send failed");
                self.metrics.inc_send_failures();
            }
        }
    }
}

impl Transport for UdpTransport {
    fn socket_count(&self) -> usize {
        self.sockets.len()
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

        match self.serialize_envelope(&envelope) {
            Ok(data) => self.transmit(socket_id, index, &data),
            Err(e) => {
                error!(transport = %self.name, part_index = index, error = %e, "Encode failed");
                self.metrics.inc_send_failures();
            }
        }
    }
}
