//! Channel abstraction between the transmitter and the device
//!
//! [`SerialLink`] is the byte-level seam: the real implementation wraps the
//! `serialport` crate, tests substitute a scripted link.

pub mod serial;

use serde::{Deserialize, Serialize};
use std::io;

pub use serial::{list_ports, RealSerialPort, SerialPortInfo};

/// Baud rate the plotter firmware listens at
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Serial parity setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerialParity {
    #[default]
    None,
    Even,
    Odd,
}

/// Parameters for opening a serial channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Port name (e.g., "/dev/ttyUSB0", "COM8")
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Read timeout in milliseconds; bounds how long a handshake read blocks
    pub timeout_ms: u64,
    /// Data bits (5-8)
    pub data_bits: u8,
    /// Stop bits (1-2)
    pub stop_bits: u8,
    /// Parity
    pub parity: SerialParity,
    /// Hardware flow control
    pub flow_control: bool,
}

impl ConnectionParams {
    /// 8N1 parameters for `port` at `baud_rate`
    pub fn serial(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            ..Self::default()
        }
    }
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            port: default_port_name().to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: 10,
            data_bits: 8,
            stop_bits: 1,
            parity: SerialParity::None,
            flow_control: false,
        }
    }
}

/// Platform default port name
pub fn default_port_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "COM8"
    } else {
        "/dev/ttyUSB0"
    }
}

/// Byte-oriented channel to the device
pub trait SerialLink: Send {
    /// Read one byte.
    ///
    /// Returns `Ok(None)` when the read timed out with nothing available.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Write a whole frame
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()>;

    /// Name of the underlying port, for logging
    fn name(&self) -> String;
}
