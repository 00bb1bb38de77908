//! Command-line arguments for the `vectorlink` binary.

use anyhow::Context;
use std::ffi::OsString;
use std::path::PathBuf;
use vectorlink_settings::Config;

pub const HELP: &str = "\
vectorlink - stream sketches to a plotter over a serial handshake

USAGE:
  vectorlink [OPTIONS] < sketch.txt

OPTIONS:
  -c, --config <PATH>     Config file (.toml or .json)
  -p, --port <NAME>       Serial port, overrides the config
  -b, --baud <RATE>       Baud rate, overrides the config
      --list-ports        List serial ports and exit
      --exit-when-drained Exit once every point has been sent
  -V, --version           Print version
  -h, --help              Print this help

SKETCH COMMANDS (stdin, one per line):
  line X1 Y1 X2 Y2
  circle CX CY RIM_X RIM_Y
  snap SIZE
";

/// Parsed command line
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub help: bool,
    pub version: bool,
    pub list_ports: bool,
    pub exit_when_drained: bool,
    pub config: Option<PathBuf>,
    pub port: Option<String>,
    pub baud: Option<u32>,
}

impl CliArgs {
    /// Parse the process arguments
    pub fn from_env() -> anyhow::Result<Self> {
        Self::parse(std::env::args_os().skip(1).collect())
    }

    /// Parse an argument list (without the program name)
    pub fn parse(args: Vec<OsString>) -> anyhow::Result<Self> {
        let mut pargs = pico_args::Arguments::from_vec(args);

        let parsed = Self {
            help: pargs.contains(["-h", "--help"]),
            version: pargs.contains(["-V", "--version"]),
            list_ports: pargs.contains("--list-ports"),
            exit_when_drained: pargs.contains("--exit-when-drained"),
            config: pargs.opt_value_from_str(["-c", "--config"])?,
            port: pargs.opt_value_from_str(["-p", "--port"])?,
            baud: pargs.opt_value_from_str(["-b", "--baud"])?,
        };

        let rest = pargs.finish();
        if !rest.is_empty() {
            anyhow::bail!("Unexpected arguments: {:?}", rest);
        }
        Ok(parsed)
    }

    /// Load the config file and apply command-line overrides
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => match Config::default_path() {
                Ok(path) => Config::load_or_default(&path)
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                Err(e) => {
                    tracing::debug!("{}; using default settings", e);
                    Config::default()
                }
            },
        };

        if let Some(port) = &self.port {
            config.connection.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.connection.baud_rate = baud;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_parse_flags_and_values() {
        let cli = CliArgs::parse(args(&["--port", "COM4", "-b", "19200", "--exit-when-drained"]))
            .unwrap();
        assert_eq!(cli.port.as_deref(), Some("COM4"));
        assert_eq!(cli.baud, Some(19200));
        assert!(cli.exit_when_drained);
        assert!(!cli.list_ports);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(CliArgs::parse(args(&["--frobnicate"])).is_err());
        assert!(CliArgs::parse(args(&["--baud", "fast"])).is_err());
    }

    #[test]
    fn test_overrides_apply_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[connection]\nport = \"/dev/ttyUSB3\"\nbaud_rate = 4800\n").unwrap();

        let cli = CliArgs {
            config: Some(path),
            baud: Some(9600),
            ..CliArgs::default()
        };
        let config = cli.load_config().unwrap();
        assert_eq!(config.connection.port, "/dev/ttyUSB3");
        assert_eq!(config.connection.baud_rate, 9600);
    }

    #[test]
    fn test_zero_baud_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{}").unwrap();

        let cli = CliArgs {
            config: Some(path),
            baud: Some(0),
            ..CliArgs::default()
        };
        assert!(cli.load_config().is_err());
    }
}
