//! # Record Store
//!
//! Bounded, randomly-addressable record source backed by a JSON document
//! of named collections.
//!
//! Responsibilities:
//! - Resolve a `(location, collection, field)` identity at open time
//! - Random-access reads by position into a store-owned buffer
//! - Bulk extraction of all slots as ordered groups
//!
//! # Example
//!
//! ```no_run
//! use contracts::{FieldLayout, StoreConfig};
//! use record_store::RecordStore;
//!
//! let config = StoreConfig {
//!     location: "events.json".into(),
//!     collection: "events".into(),
//!     field: "hits".into(),
//!     layout: FieldLayout::Collection,
//! };
//! let mut store = RecordStore::<serde_json::Value>::new();
//! store.open(&config).unwrap();
//! println!("records: {}", store.count());
//! ```

mod store;

pub use store::RecordStore;
