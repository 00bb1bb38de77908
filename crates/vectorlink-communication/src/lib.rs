//! # VectorLink Communication
//!
//! Serial channel handling and the handshake-paced transmitter that streams
//! the shared point log to the plotter.

pub mod communication;
pub mod transmitter;

pub use communication::{
    default_port_name,
    serial::{list_ports, RealSerialPort, SerialPortInfo},
    ConnectionParams, SerialLink, SerialParity, DEFAULT_BAUD_RATE,
};

pub use transmitter::{
    Connector, Cycle, SerialTransmitter, TransmitterConfig, TransmitterHandle, TransmitterReport,
    TransmitterState, TransmitterStatus, DEFAULT_TRIGGER_BYTE, THREAD_NAME,
};
