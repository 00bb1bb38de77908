//! Serial port communication implementation
//!
//! Provides the hardware side of [`SerialLink`] on top of the `serialport`
//! crate, plus port enumeration for picking the plotter.
//!
//! Supports:
//! - Port enumeration and discovery
//! - Baud rate, data bits, stop bits, parity and flow control
//! - Reads bounded by a short timeout so the transmitter can notice shutdown

use super::{ConnectionParams, SerialLink, SerialParity};
use std::io::{self, Read, Write};
use std::time::Duration;
use vectorlink_core::{ConnectionError, Error, Result};

/// Information about an available serial port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyUSB0", "COM8")
    pub port_name: String,

    /// Port description (e.g., "USB Serial Port")
    pub description: String,

    /// Manufacturer name if available
    pub manufacturer: Option<String>,

    /// USB vendor ID if applicable
    pub vid: Option<u16>,

    /// USB product ID if applicable
    pub pid: Option<u16>,
}

impl SerialPortInfo {
    /// Create a new port info
    pub fn new(port_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            description: description.into(),
            manufacturer: None,
            vid: None,
            pid: None,
        }
    }

    /// Set manufacturer
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Set USB IDs
    pub fn with_usb_ids(mut self, vid: u16, pid: u16) -> Self {
        self.vid = Some(vid);
        self.pid = Some(pid);
        self
    }
}

/// List available serial ports on the system, sorted by name
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        tracing::error!("Failed to enumerate serial ports: {}", e);
        Error::other(format!("Failed to enumerate ports: {}", e))
    })?;

    let mut infos: Vec<SerialPortInfo> = ports
        .iter()
        .map(|port| {
            let info = SerialPortInfo::new(&port.port_name, get_port_description(port));
            match &port.port_type {
                serialport::SerialPortType::UsbPort(usb_info) => {
                    let info = info.with_usb_ids(usb_info.vid, usb_info.pid);
                    match usb_info.manufacturer {
                        Some(ref mfg) => info.with_manufacturer(mfg),
                        None => info,
                    }
                }
                _ => info,
            }
        })
        .collect();

    infos.sort_by(|a, b| a.port_name.cmp(&b.port_name));
    Ok(infos)
}

/// Get a user-friendly description for a port
fn get_port_description(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb_info) => {
            format!(
                "USB {} {}",
                usb_info.manufacturer.as_deref().unwrap_or("Device"),
                usb_info.product.as_deref().unwrap_or("Serial Port")
            )
        }
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

/// Convert a parity setting to serialport format
fn to_serialport_parity(parity: SerialParity) -> serialport::Parity {
    match parity {
        SerialParity::None => serialport::Parity::None,
        SerialParity::Even => serialport::Parity::Even,
        SerialParity::Odd => serialport::Parity::Odd,
    }
}

/// Check parameters before touching the hardware
fn validate_params(params: &ConnectionParams) -> std::result::Result<(), ConnectionError> {
    if params.port.trim().is_empty() {
        return Err(ConnectionError::InvalidParameters {
            reason: "port name is empty".to_string(),
        });
    }
    if params.baud_rate == 0 {
        return Err(ConnectionError::InvalidParameters {
            reason: "baud rate must be positive".to_string(),
        });
    }
    if params.timeout_ms == 0 {
        return Err(ConnectionError::InvalidParameters {
            reason: "read timeout must be positive".to_string(),
        });
    }
    Ok(())
}

/// Real serial port implementation using serialport crate
pub struct RealSerialPort {
    port: Box<dyn serialport::SerialPort>,
    name: String,
}

impl RealSerialPort {
    /// Open a serial port with the given parameters
    pub fn open(params: &ConnectionParams) -> std::result::Result<Self, ConnectionError> {
        validate_params(params)?;

        let data_bits = match params.data_bits {
            5 => serialport::DataBits::Five,
            6 => serialport::DataBits::Six,
            7 => serialport::DataBits::Seven,
            8 => serialport::DataBits::Eight,
            other => {
                return Err(ConnectionError::InvalidParameters {
                    reason: format!("Invalid data bits: {}", other),
                })
            }
        };

        let stop_bits = match params.stop_bits {
            1 => serialport::StopBits::One,
            2 => serialport::StopBits::Two,
            other => {
                return Err(ConnectionError::InvalidParameters {
                    reason: format!("Invalid stop bits: {}", other),
                })
            }
        };

        let builder = serialport::new(&params.port, params.baud_rate)
            .timeout(Duration::from_millis(params.timeout_ms))
            .data_bits(data_bits)
            .stop_bits(stop_bits)
            .parity(to_serialport_parity(params.parity))
            .flow_control(if params.flow_control {
                serialport::FlowControl::Hardware
            } else {
                serialport::FlowControl::None
            });

        match builder.open() {
            Ok(port) => {
                tracing::info!(
                    "Opened serial port {} at {} baud",
                    params.port,
                    params.baud_rate
                );
                Ok(RealSerialPort {
                    port,
                    name: params.port.clone(),
                })
            }
            Err(e) => {
                tracing::warn!("Failed to open serial port {}: {}", params.port, e);
                Err(ConnectionError::FailedToOpen {
                    port: params.port.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

impl SerialLink for RealSerialPort {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self.port.write_all(frame)?;
        self.port.flush()
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_info_builder() {
        let info = SerialPortInfo::new("/dev/ttyUSB0", "USB Serial")
            .with_manufacturer("FTDI")
            .with_usb_ids(0x0403, 0x6001);

        assert_eq!(info.port_name, "/dev/ttyUSB0");
        assert_eq!(info.manufacturer.as_deref(), Some("FTDI"));
        assert_eq!(info.vid, Some(0x0403));
        assert_eq!(info.pid, Some(0x6001));
    }

    #[test]
    fn test_validate_params() {
        assert!(validate_params(&ConnectionParams::serial("COM8", 9600)).is_ok());
        assert!(validate_params(&ConnectionParams::serial("", 9600)).is_err());
        assert!(validate_params(&ConnectionParams::serial("COM8", 0)).is_err());
    }

    #[test]
    fn test_open_rejects_bad_data_bits() {
        let mut params = ConnectionParams::serial("COM8", 9600);
        params.data_bits = 9;
        assert!(matches!(
            RealSerialPort::open(&params),
            Err(ConnectionError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_open_missing_port_fails() {
        let params = ConnectionParams::serial("/dev/does-not-exist-vectorlink", 9600);
        let err = RealSerialPort::open(&params).err();
        assert!(matches!(err, Some(ConnectionError::FailedToOpen { .. })));
    }
}
