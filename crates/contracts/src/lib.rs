//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Index Model
//! - Record positions are `i64`, valid in `[0, capacity)` once a store is open
//! - The dispatch cursor is host-owned; the dispatcher only observes it

mod blueprint;
mod error;
mod layout;
mod store;
mod transport;

pub use blueprint::*;
pub use error::*;
pub use layout::FieldLayout;
pub use store::BoundedStore;
pub use transport::{CurrentIndexFn, SendOneFn, SocketCountFn, Transport};
