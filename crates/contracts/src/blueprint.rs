//! StreamBlueprint - Config Loader output
//!
//! Describes one complete streaming run: the backing store, the dispatch
//! cadence, and the outbound transport.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::FieldLayout;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete streaming run blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Backing record store
    pub store: StoreConfig,

    /// Dispatch cadence and grouping
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Outbound transport
    pub transport: TransportConfig,
}

/// Record store identity: where the source lives, which collection inside
/// it, and which field of each slot holds the payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the backing JSON document
    pub location: PathBuf,

    /// Top-level collection name within the document
    pub collection: String,

    /// Field of each slot holding the typed payload
    pub field: String,

    /// Payload layout within each slot
    #[serde(default)]
    pub layout: FieldLayout,
}

/// Dispatch cadence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Records grouped into one multipart unit per socket per cycle, must be >= 1
    #[serde(default = "default_group_size")]
    pub group_size: usize,

    /// Interval between dispatch cycles in milliseconds
    #[serde(default = "default_cycle_interval_ms")]
    pub cycle_interval_ms: u64,

    /// Maximum dispatch cycles to run (0 = until drained)
    #[serde(default)]
    pub max_cycles: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            group_size: default_group_size(),
            cycle_interval_ms: default_cycle_interval_ms(),
            max_cycles: 0,
        }
    }
}

fn default_group_size() -> usize {
    1
}

fn default_cycle_interval_ms() -> u64 {
    100
}

/// Transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Transport name (used for logging/metrics)
    pub name: String,

    /// Transport kind
    pub kind: TransportKind,

    /// Number of output sockets (udp derives it from its target list instead)
    #[serde(default = "default_socket_count")]
    pub sockets: usize,

    /// Kind-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_socket_count() -> usize {
    1
}

/// Transport kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Log each part via tracing (dry runs, tests)
    Log,
    /// One JSONL stream per socket under a base directory
    File,
    /// One UDP socket per configured target address
    Udp,
}
