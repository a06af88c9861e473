//! Transport capability set - Dispatcher output interface
//!
//! The dispatcher depends on exactly three host-supplied operations and
//! implements none of them. They can be bound one at a time as bare
//! function values (the callback aliases below) or all at once from a
//! `Transport` implementation.

use std::sync::Arc;

/// Reports how many parallel output sockets exist this cycle
pub type SocketCountFn = Arc<dyn Fn() -> usize + Send + Sync>;

/// Reports the position the host considers next to send
pub type CurrentIndexFn = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Sends one part on the given socket and advances the host cursor
pub type SendOneFn = Arc<dyn Fn(usize) + Send + Sync>;

/// Output transport trait
///
/// Abstracts a multi-socket outbound channel. The dispatcher never
/// inspects send results; delivery, retry, and framing are entirely the
/// implementation's concern.
///
/// # Contract
///
/// `send_one` must advance whatever state `current_index` reports next,
/// before it returns. The dispatcher's bound-safety guarantee rests on
/// that ordering; an implementation that defers the advance (e.g. a
/// non-blocking send completing later) breaks it.
pub trait Transport: Send + Sync {
    /// Number of parallel output sockets available
    ///
    /// May change between dispatch cycles, never mid-cycle; the
    /// dispatcher reads it once per cycle.
    fn socket_count(&self) -> usize;

    /// The host-owned cursor: next position to send
    fn current_index(&self) -> i64;

    /// Send one part of the current record on socket `socket_id`
    ///
    /// Blocking from the dispatcher's perspective. Failures have no
    /// result channel here; implementations log and count them.
    fn send_one(&self, socket_id: usize);
}
