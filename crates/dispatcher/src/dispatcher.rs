//! BatchDispatcher - fixed-size multipart fan-out across sockets

use std::sync::Arc;

use tracing::{debug, instrument};

use contracts::{BoundedStore, Transport};

use crate::binding::TransportBinding;
use crate::error::DispatcherError;

/// Drives one fixed-size dispatch cycle across every output socket
///
/// The dispatcher owns no transport state of its own; it consumes the
/// store's bound for its guard and the bound callbacks for everything else.
/// `send_one` is opaque and effectful, and is expected to advance whatever
/// `current_index` next reports.
pub struct BatchDispatcher {
    store: Arc<dyn BoundedStore + Send + Sync>,
    binding: TransportBinding,
}

impl BatchDispatcher {
    /// Create a dispatcher over a bounded store, with nothing bound yet
    pub fn new(store: Arc<dyn BoundedStore + Send + Sync>) -> Self {
        Self {
            store,
            binding: TransportBinding::new(),
        }
    }

    /// Access the binding slots for individual capability registration
    pub fn binding_mut(&mut self) -> &mut TransportBinding {
        &mut self.binding
    }

    /// Register all three capabilities from one transport
    pub fn bind_transport(&mut self, transport: Arc<dyn Transport>) {
        self.binding.bind_transport(transport);
    }

    /// Run one dispatch cycle: up to `group_size` sends per socket
    ///
    /// The start index is captured once at entry and the socket count is
    /// read once per cycle, so every socket in the cycle sees the same
    /// guard even though sends advance the transport's cursor mid-loop.
    /// A socket is skipped entirely when no whole group fits between the
    /// entry index and the store's bound; a partial trailing group is
    /// never emitted. Per-send failures are the transport's concern and
    /// have no result channel here.
    ///
    /// # Errors
    /// - `InvalidGroupSize` - `group_size == 0`, checked before bindings
    /// - `Binding` - a capability is unbound; no callback was invoked
    #[instrument(name = "dispatch_cycle", skip(self))]
    pub fn dispatch(&self, group_size: usize) -> Result<(), DispatcherError> {
        if group_size == 0 {
            return Err(DispatcherError::InvalidGroupSize);
        }

        let callbacks = self.binding.resolve()?;

        let start_index = (callbacks.current_index)();
        let total = self.store.record_count();
        let socket_count = (callbacks.socket_count)();

        debug!(start_index, total, socket_count, "Dispatch cycle started");

        let mut served = 0usize;
        for socket_id in 0..socket_count {
            if start_index + group_size as i64 >= total {
                debug!(socket_id, start_index, total, "No whole group remains, socket skipped");
                continue;
            }

            for _ in 0..group_size {
                (callbacks.send_one)(socket_id);
            }
            served += 1;
        }

        debug!(served, socket_count, "Dispatch cycle complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::BindingError;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedStore(i64);

    impl BoundedStore for FixedStore {
        fn record_count(&self) -> i64 {
            self.0
        }
    }

    struct MockTransport {
        sockets: usize,
        cursor: AtomicI64,
        sends: Mutex<Vec<usize>>,
    }

    impl MockTransport {
        fn new(sockets: usize, start: i64) -> Self {
            Self {
                sockets,
                cursor: AtomicI64::new(start),
                sends: Mutex::new(Vec::new()),
            }
        }

        fn sends(&self) -> Vec<usize> {
            self.sends.lock().unwrap().clone()
        }
    }

    impl Transport for MockTransport {
        fn socket_count(&self) -> usize {
            self.sockets
        }

        fn current_index(&self) -> i64 {
            self.cursor.load(Ordering::SeqCst)
        }

        fn send_one(&self, socket_id: usize) {
            self.cursor.fetch_add(1, Ordering::SeqCst);
            self.sends.lock().unwrap().push(socket_id);
        }
    }

    fn dispatcher_with(total: i64, transport: Arc<MockTransport>) -> BatchDispatcher {
        let mut dispatcher = BatchDispatcher::new(Arc::new(FixedStore(total)));
        dispatcher.bind_transport(transport);
        dispatcher
    }

    #[test]
    fn test_every_socket_gets_a_full_group() {
        let transport = Arc::new(MockTransport::new(3, 0));
        let dispatcher = dispatcher_with(100, Arc::clone(&transport));

        dispatcher.dispatch(5).unwrap();

        let sends = transport.sends();
        assert_eq!(sends.len(), 15);
        assert_eq!(&sends[0..5], &[0; 5]);
        assert_eq!(&sends[5..10], &[1; 5]);
        assert_eq!(&sends[10..15], &[2; 5]);
        assert_eq!(transport.current_index(), 15);
    }

    #[test]
    fn test_near_end_skips_every_socket() {
        let transport = Arc::new(MockTransport::new(3, 96));
        let dispatcher = dispatcher_with(100, Arc::clone(&transport));

        dispatcher.dispatch(5).unwrap();

        assert!(transport.sends().is_empty());
        assert_eq!(transport.current_index(), 96);
    }

    #[test]
    fn test_exact_fit_is_still_skipped() {
        // start + group_size == total leaves no whole group
        let transport = Arc::new(MockTransport::new(1, 95));
        let dispatcher = dispatcher_with(100, Arc::clone(&transport));

        dispatcher.dispatch(5).unwrap();
        assert!(transport.sends().is_empty());
    }

    #[test]
    fn test_guard_uses_entry_index_for_all_sockets() {
        // 2 sockets, 8 records, group 3: entry index 0 admits both sockets
        // even though the first socket's sends push the cursor to 3.
        let transport = Arc::new(MockTransport::new(2, 0));
        let dispatcher = dispatcher_with(8, Arc::clone(&transport));

        dispatcher.dispatch(3).unwrap();

        assert_eq!(transport.sends().len(), 6);
        assert_eq!(transport.current_index(), 6);
    }

    #[test]
    fn test_zero_group_size_fails_before_bindings() {
        let dispatcher = BatchDispatcher::new(Arc::new(FixedStore(10)));
        let result = dispatcher.dispatch(0);
        assert!(matches!(result, Err(DispatcherError::InvalidGroupSize)));
    }

    #[test]
    fn test_partial_binding_fails_without_invoking_callbacks() {
        let invoked = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invoked);

        let mut dispatcher = BatchDispatcher::new(Arc::new(FixedStore(10)));
        dispatcher.binding_mut().bind_socket_count(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            1
        }));

        let result = dispatcher.dispatch(2);
        assert!(matches!(
            result,
            Err(DispatcherError::Binding(BindingError::UnboundCallback {
                name: "current_index"
            }))
        ));
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_socket_count_read_once_per_cycle() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reads);

        let mut dispatcher = BatchDispatcher::new(Arc::new(FixedStore(100)));
        dispatcher.binding_mut().bind_socket_count(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            4
        }));
        dispatcher.binding_mut().bind_current_index(Arc::new(|| 0));
        dispatcher.binding_mut().bind_send_one(Arc::new(|_| {}));

        dispatcher.dispatch(2).unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_store_dispatch_is_a_quiet_no_op() {
        let transport = Arc::new(MockTransport::new(2, 0));
        let dispatcher = dispatcher_with(0, Arc::clone(&transport));

        dispatcher.dispatch(1).unwrap();
        assert!(transport.sends().is_empty());
    }
}
