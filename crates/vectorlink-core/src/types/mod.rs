//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Type aliases for the lock-wrapped state shared between the
//!   sketching thread and the transmitter thread.

pub mod aliases;

pub use aliases::*;
