//! Configuration for VectorLink
//!
//! Supports JSON and TOML files; the format is picked from the extension.
//! Missing sections and keys fall back to their defaults, so a file only
//! needs to name what it changes.
//!
//! Configuration is organized into logical sections:
//! - Connection settings (port, baud rate, read timeout)
//! - Transmitter settings (handshake byte, polling, range policy, reconnect)
//! - Sketch settings (grid size)

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use vectorlink_communication::{
    default_port_name, ConnectionParams, TransmitterConfig, DEFAULT_BAUD_RATE,
    DEFAULT_TRIGGER_BYTE,
};
use vectorlink_core::RangePolicy;

/// Directory name under the platform config dir
pub const APP_DIR: &str = "vectorlink";

/// File name of the default config
pub const CONFIG_FILE: &str = "config.toml";

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Serial port name
    pub port: String,
    /// Baud rate for the serial link
    pub baud_rate: u32,
    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            port: default_port_name().to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: 10,
        }
    }
}

/// Transmitter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmitterSettings {
    /// Byte the device sends to request a point
    pub trigger_byte: u8,
    /// Idle delay in milliseconds between unproductive reads
    pub poll_interval_ms: u64,
    /// Handling of coordinates outside 0..=255
    pub range_policy: RangePolicy,
    /// Reopen attempts after a channel failure (0 = stop on first failure)
    pub reconnect_attempts: u32,
    /// Delay before each reopen attempt, in milliseconds
    pub reconnect_delay_ms: u64,
}

impl Default for TransmitterSettings {
    fn default() -> Self {
        Self {
            trigger_byte: DEFAULT_TRIGGER_BYTE,
            poll_interval_ms: 1,
            range_policy: RangePolicy::Reject,
            reconnect_attempts: 0,
            reconnect_delay_ms: 1000,
        }
    }
}

/// Sketch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchSettings {
    /// Grid size coordinates are snapped to
    pub snap_size: i32,
}

impl Default for SketchSettings {
    fn default() -> Self {
        Self { snap_size: 10 }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionSettings,
    pub transmitter: TransmitterSettings,
    pub sketch: SketchSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location (`<config dir>/vectorlink/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::ConfigDirectory(e.to_string()))?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.connection.port.trim().is_empty() {
            return Err(SettingsError::invalid("connection.port", "must not be empty"));
        }
        if self.connection.baud_rate == 0 {
            return Err(SettingsError::invalid("connection.baud_rate", "must be > 0"));
        }
        if self.connection.read_timeout_ms == 0 {
            return Err(SettingsError::invalid(
                "connection.read_timeout_ms",
                "must be > 0",
            ));
        }
        if self.sketch.snap_size < 1 {
            return Err(SettingsError::invalid("sketch.snap_size", "must be > 0"));
        }
        Ok(())
    }

    /// Serial parameters for the configured port
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams {
            timeout_ms: self.connection.read_timeout_ms,
            ..ConnectionParams::serial(&self.connection.port, self.connection.baud_rate)
        }
    }

    /// Transmitter loop configuration
    pub fn transmitter_config(&self) -> TransmitterConfig {
        let t = &self.transmitter;
        TransmitterConfig {
            trigger_byte: t.trigger_byte,
            poll_interval: Duration::from_millis(t.poll_interval_ms),
            range_policy: t.range_policy,
            reconnect_attempts: t.reconnect_attempts,
            reconnect_delay: Duration::from_millis(t.reconnect_delay_ms),
        }
    }
}
