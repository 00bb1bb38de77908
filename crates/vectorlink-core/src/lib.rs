//! # VectorLink Core
//!
//! Core types for VectorLink: the [`Coordinate`] drawing instruction, its
//! fixed-width wire encoding, the shared append-only [`PointLog`], and the
//! error types used across the workspace.

pub mod coordinate;
pub mod error;
pub mod point_log;
pub mod types;

pub use coordinate::{
    decode, encode, encode_with, Coordinate, Identifier, RangePolicy, FIELD_MAX, FRAME_LEN,
    HEX_PREFIX,
};
pub use error::{ConnectionError, EncodeError, Error, Result};
pub use point_log::PointLog;

pub use types::{shutdown_flag, thread_safe_rw, ShutdownFlag, ThreadSafeRw};
