//! BoundedStore trait - the one store capability the dispatcher consumes

use std::sync::{Arc, Mutex};

/// A bounded record source
///
/// The dispatcher only needs the store's bound to size its guard; reads
/// happen inside the transport, not the dispatcher.
pub trait BoundedStore {
    /// Total addressable record count; 0 if unopened
    fn record_count(&self) -> i64;
}

/// A poisoned lock reads as empty rather than panicking the dispatch loop.
impl<S: BoundedStore + ?Sized> BoundedStore for Mutex<S> {
    fn record_count(&self) -> i64 {
        self.lock().map_or(0, |guard| guard.record_count())
    }
}

impl<S: BoundedStore + ?Sized> BoundedStore for Arc<S> {
    fn record_count(&self) -> i64 {
        (**self).record_count()
    }
}
