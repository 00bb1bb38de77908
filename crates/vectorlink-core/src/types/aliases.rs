//! Type aliases for state shared across threads.
//!
//! The sketching side and the transmitter run on separate threads for the
//! lifetime of the process. Everything they share goes through one of these
//! aliases so the locking strategy is visible at a glance.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vectorlink_core::types::*;
//!
//! let state: ThreadSafeRw<TransmitterState> = thread_safe_rw(TransmitterState::default());
//! let stop: ShutdownFlag = shutdown_flag();
//! ```

use parking_lot::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// A thread-safe reader-writer lock wrapper for read-heavy workloads.
///
/// Uses `parking_lot::RwLock`: no poisoning, so readers never have to handle
/// a panicked writer.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// A cooperative stop signal checked by long-running loops.
pub type ShutdownFlag = Arc<AtomicBool>;

/// Create a new `ThreadSafeRw<T>` from a value.
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}

/// Create a new, unset `ShutdownFlag`.
#[inline]
pub fn shutdown_flag() -> ShutdownFlag {
    Arc::new(AtomicBool::new(false))
}
