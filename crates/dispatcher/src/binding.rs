//! TransportBinding - late registration of transport capabilities

use std::sync::Arc;

use tracing::debug;

use contracts::{BindingError, CurrentIndexFn, SendOneFn, SocketCountFn, Transport};

/// Registration slot for the three transport capabilities
///
/// Capabilities are bound after construction, individually or all at once
/// from a [`Transport`] implementation. Dispatch requires all three; a
/// missing one is reported by name before any bound callback runs.
#[derive(Default)]
pub struct TransportBinding {
    socket_count: Option<SocketCountFn>,
    current_index: Option<CurrentIndexFn>,
    send_one: Option<SendOneFn>,
}

/// Resolved view over a fully-bound [`TransportBinding`]
pub(crate) struct BoundCallbacks<'a> {
    pub socket_count: &'a SocketCountFn,
    pub current_index: &'a CurrentIndexFn,
    pub send_one: &'a SendOneFn,
}

impl TransportBinding {
    /// Create an empty binding with no capabilities registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the socket-count capability, replacing any previous one
    pub fn bind_socket_count(&mut self, callback: SocketCountFn) {
        self.socket_count = Some(callback);
    }

    /// Register the current-index capability, replacing any previous one
    pub fn bind_current_index(&mut self, callback: CurrentIndexFn) {
        self.current_index = Some(callback);
    }

    /// Register the send capability, replacing any previous one
    pub fn bind_send_one(&mut self, callback: SendOneFn) {
        self.send_one = Some(callback);
    }

    /// Register all three capabilities from one transport
    pub fn bind_transport(&mut self, transport: Arc<dyn Transport>) {
        debug!("Binding all transport capabilities");
        let t = Arc::clone(&transport);
        self.bind_socket_count(Arc::new(move || t.socket_count()));
        let t = Arc::clone(&transport);
        self.bind_current_index(Arc::new(move || t.current_index()));
        self.bind_send_one(Arc::new(move |socket_id| transport.send_one(socket_id)));
    }

    /// Whether every capability is registered
    pub fn is_complete(&self) -> bool {
        self.socket_count.is_some() && self.current_index.is_some() && self.send_one.is_some()
    }

    /// Resolve the binding, naming the first missing capability
    pub(crate) fn resolve(&self) -> Result<BoundCallbacks<'_>, BindingError> {
        let socket_count = self
            .socket_count
            .as_ref()
            .ok_or(BindingError::unbound("socket_count"))?;
        let current_index = self
            .current_index
            .as_ref()
            .ok_or(BindingError::unbound("current_index"))?;
        let send_one = self
            .send_one
            .as_ref()
            .ok_or(BindingError::unbound("send_one"))?;

        Ok(BoundCallbacks {
            socket_count,
            current_index,
            send_one,
        })
    }
}
