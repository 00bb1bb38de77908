//! # VectorLink
//!
//! Streams sketched line segments and circles to a plotter over a serial
//! link, one point per handshake byte from the device.
//!
//! ## Architecture
//!
//! VectorLink is organized as a workspace with multiple crates:
//!
//! 1. **vectorlink-core** - `Coordinate`, wire encoding, the shared `PointLog`, errors
//! 2. **vectorlink-communication** - Serial link and the handshake-paced transmitter
//! 3. **vectorlink-designer** - Grid snapping and gesture-to-coordinate conversion
//! 4. **vectorlink-settings** - Configuration files
//! 5. **vectorlink** - Main binary that wires a sketch source to the transmitter

pub mod cli;
pub mod producer;

pub use vectorlink_communication::{
    list_ports, ConnectionParams, SerialLink, SerialPortInfo, SerialTransmitter,
    TransmitterConfig, TransmitterHandle, TransmitterReport, TransmitterState,
};
pub use vectorlink_core::{
    encode, encode_with, ConnectionError, Coordinate, EncodeError, Error, Identifier, PointLog,
    RangePolicy, Result,
};
pub use vectorlink_designer::{DrawingMode, SketchCommand, Sketcher};
pub use vectorlink_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, keeping stdout for command output
/// - RUST_LOG environment variable support (default `info`)
/// - Thread names, so transmitter lines stand out
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
