//! # Dispatcher
//!
//! Fixed-size multipart dispatch across output sockets.
//!
//! Responsibilities:
//! - Register transport capabilities late, individually or as one bundle
//! - Drive one dispatch cycle per call: N sends per socket, or skip
//! - Reference transports (log / file / udp) with per-transport metrics

pub mod binding;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod transports;

pub use binding::TransportBinding;
pub use contracts::{BoundedStore, Transport};
pub use dispatcher::BatchDispatcher;
pub use error::DispatcherError;
pub use metrics::{MetricsSnapshot, TransportMetrics};
pub use transports::{
    create_transport, FileTransport, LogTransport, PartEnvelope, SharedStore, UdpTransport,
};
