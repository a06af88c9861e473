//! Reference transports: log, file, udp

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use contracts::{StoreError, Transport, TransportConfig, TransportKind};
use record_store::RecordStore;

use crate::error::DispatcherError;

mod file;
mod log;
mod udp;

pub use file::{FileTransport, FileTransportConfig};
pub use log::LogTransport;
pub use udp::{UdpTransport, UdpTransportConfig, WireFormat};

/// Store handle shared between the host and its transports
pub type SharedStore = Arc<Mutex<RecordStore<Value>>>;

/// Wire envelope for one dispatched part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartEnvelope {
    /// Store position this part was read from
    pub part_index: i64,
    /// Socket the part was sent on
    pub socket: usize,
    /// The record payload
    pub payload: Value,
}

/// Read the record at `position` out of the shared store
pub(crate) fn read_record(store: &SharedStore, position: i64) -> Result<Value, StoreError> {
    let mut guard = store
        .lock()
        .map_err(|_| StoreError::source_unreachable("store", "lock poisoned"))?;
    guard.read_at(position).cloned()
}

/// Create a transport from configuration
pub fn create_transport(
    config: &TransportConfig,
    store: SharedStore,
) -> Result<Arc<dyn Transport>, DispatcherError> {
    match config.kind {
        TransportKind::Log => Ok(Arc::new(LogTransport::new(
            &config.name,
            config.sockets,
            store,
        ))),
        TransportKind::File => {
            let transport =
                FileTransport::from_params(&config.name, config.sockets, &config.params, store)
                    .map_err(|e| DispatcherError::transport_creation(&config.name, e.to_string()))?;
            Ok(Arc::new(transport))
        }
        TransportKind::Udp => {
            let transport = UdpTransport::from_params(&config.name, &config.params, store)
                .map_err(|e| DispatcherError::transport_creation(&config.name, e.to_string()))?;
            Ok(Arc::new(transport))
        }
    }
}
