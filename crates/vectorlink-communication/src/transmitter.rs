//! Handshake-paced transmitter
//!
//! Streams coordinates from a [`PointLog`] to the device, one frame per
//! handshake byte. The device paces everything: the transmitter never reads
//! ahead more than one byte and never writes more than one frame per trigger.
//!
//! ```text
//!            byte != trigger, or nothing pending
//!          +-------------------+
//!          v                   |
//!   AwaitingHandshake ---------+
//!          |   ^
//! trigger  |   | frame written, cursor advanced
//!          v   |
//!      Transmitting
//!
//!   any I/O failure -> Faulted      shutdown requested -> Stopped
//! ```
//!
//! The loop runs on a dedicated, named thread. I/O failures end only that
//! thread; the log stays usable by the sketching side.

use crate::communication::{ConnectionParams, RealSerialPort, SerialLink};
use std::fmt;
use std::io;
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use vectorlink_core::{
    encode_with, shutdown_flag, thread_safe_rw, ConnectionError, PointLog, RangePolicy,
    ShutdownFlag, ThreadSafeRw,
};

/// Byte the device sends to request the next point (carriage return)
pub const DEFAULT_TRIGGER_BYTE: u8 = 13;

/// Name given to the transmitter thread
pub const THREAD_NAME: &str = "serial-transmitter";

/// Reopens the channel after an I/O failure
pub type Connector =
    Box<dyn FnMut() -> Result<Box<dyn SerialLink>, ConnectionError> + Send + 'static>;

/// Transmitter state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransmitterState {
    /// Waiting for the device to ask for a point
    #[default]
    AwaitingHandshake,
    /// Writing one frame
    Transmitting,
    /// The channel failed; terminal
    Faulted,
    /// Shut down on request; terminal
    Stopped,
}

impl TransmitterState {
    /// Whether the loop has ended
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Faulted | Self::Stopped)
    }
}

impl fmt::Display for TransmitterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingHandshake => write!(f, "awaiting handshake"),
            Self::Transmitting => write!(f, "transmitting"),
            Self::Faulted => write!(f, "faulted"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Configuration for the transmitter loop
#[derive(Debug, Clone)]
pub struct TransmitterConfig {
    /// Byte that requests the next point
    pub trigger_byte: u8,
    /// Idle delay after a byte that did not produce a write
    pub poll_interval: Duration,
    /// How to encode fields outside 0..=255
    pub range_policy: RangePolicy,
    /// Consecutive reopen attempts after an I/O failure; 0 means fail-stop
    pub reconnect_attempts: u32,
    /// Delay before each reopen attempt
    pub reconnect_delay: Duration,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            trigger_byte: DEFAULT_TRIGGER_BYTE,
            poll_interval: Duration::from_millis(1),
            range_policy: RangePolicy::Reject,
            reconnect_attempts: 0,
            reconnect_delay: Duration::from_millis(1000),
        }
    }
}

/// Live counters, readable from other threads through a [`TransmitterHandle`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransmitterStatus {
    /// Current state
    pub state: TransmitterState,
    /// Index of the next point to consider
    pub cursor: usize,
    /// Frames written
    pub points_sent: usize,
    /// Points skipped because they could not be encoded
    pub points_rejected: usize,
    /// Bytes discarded because they were not the trigger
    pub bytes_ignored: usize,
    /// Trigger bytes that arrived with nothing pending
    pub handshakes_unserved: usize,
}

/// Final outcome of a transmitter run
#[derive(Debug, Clone)]
pub struct TransmitterReport {
    /// Counters at the time the loop ended
    pub status: TransmitterStatus,
    /// The failure that faulted the loop, if any
    pub error: Option<ConnectionError>,
}

/// Result of one read-decide-write cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cycle {
    /// The read timed out with nothing to read
    Idle,
    /// A byte other than the trigger arrived
    Ignored(u8),
    /// The trigger arrived but no point was pending
    Unserved,
    /// A frame was written for the point at `index`
    Sent { index: usize, frame: String },
}

/// Bridges a [`PointLog`] to a serial channel
pub struct SerialTransmitter {
    link: Box<dyn SerialLink>,
    log: PointLog,
    config: TransmitterConfig,
    cursor: usize,
    status: ThreadSafeRw<TransmitterStatus>,
    shutdown: ShutdownFlag,
    connector: Option<Connector>,
}

impl SerialTransmitter {
    /// Create a transmitter over an already open link
    pub fn new(link: Box<dyn SerialLink>, log: PointLog, config: TransmitterConfig) -> Self {
        Self {
            link,
            log,
            config,
            cursor: 0,
            status: thread_safe_rw(TransmitterStatus::default()),
            shutdown: shutdown_flag(),
            connector: None,
        }
    }

    /// Open the serial port described by `params` and wrap it.
    ///
    /// When `config.reconnect_attempts` is non-zero the same parameters are
    /// used to reopen the port after an I/O failure.
    pub fn open(
        params: &ConnectionParams,
        log: PointLog,
        config: TransmitterConfig,
    ) -> Result<Self, ConnectionError> {
        let link = RealSerialPort::open(params).inspect_err(|e| {
            tracing::error!("Transmitter could not open channel: {}", e);
        })?;

        let reopen_params = params.clone();
        let connector: Connector = Box::new(move || {
            RealSerialPort::open(&reopen_params).map(|port| Box::new(port) as Box<dyn SerialLink>)
        });

        Ok(Self::new(Box::new(link), log, config).with_connector(connector))
    }

    /// Set the function used to reopen the channel
    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Index of the next point to transmit
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current counters
    pub fn status(&self) -> TransmitterStatus {
        self.status.read().clone()
    }

    /// Flag that stops the loop when set
    pub fn shutdown_flag(&self) -> ShutdownFlag {
        self.shutdown.clone()
    }

    fn set_state(&self, state: TransmitterState) {
        self.status.write().state = state;
    }

    fn io_error(&self, e: io::Error) -> ConnectionError {
        ConnectionError::Io {
            port: self.link.name(),
            reason: e.to_string(),
        }
    }

    fn idle(&self) {
        thread::sleep(self.config.poll_interval);
    }

    /// Encode the next pending point, skipping any the range policy rejects.
    ///
    /// Returns the point's index and frame without advancing the cursor.
    fn next_frame(&mut self) -> Option<(usize, String)> {
        while let Some(coordinate) = self.log.get(self.cursor) {
            match encode_with(&coordinate, self.config.range_policy) {
                Ok(frame) => return Some((self.cursor, frame)),
                Err(e) => {
                    tracing::warn!(
                        "Skipping point {} ({}): {}",
                        self.cursor,
                        coordinate,
                        e
                    );
                    self.cursor += 1;
                    let mut status = self.status.write();
                    status.cursor = self.cursor;
                    status.points_rejected += 1;
                }
            }
        }
        None
    }

    /// Run one handshake cycle: read a byte and, on the trigger, write one frame.
    pub fn step(&mut self) -> Result<Cycle, ConnectionError> {
        let byte = self.link.read_byte().map_err(|e| self.io_error(e))?;

        let cycle = match byte {
            None => Cycle::Idle,
            Some(b) if b != self.config.trigger_byte => {
                tracing::trace!("Ignoring byte 0x{:02X}", b);
                self.status.write().bytes_ignored += 1;
                Cycle::Ignored(b)
            }
            Some(_) => match self.next_frame() {
                None => {
                    tracing::trace!("Handshake with nothing pending at {}", self.cursor);
                    self.status.write().handshakes_unserved += 1;
                    Cycle::Unserved
                }
                Some((index, frame)) => {
                    self.set_state(TransmitterState::Transmitting);
                    self.link
                        .write_frame(frame.as_bytes())
                        .map_err(|e| self.io_error(e))?;

                    self.cursor = index + 1;
                    {
                        let mut status = self.status.write();
                        status.state = TransmitterState::AwaitingHandshake;
                        status.cursor = self.cursor;
                        status.points_sent += 1;
                    }
                    tracing::debug!("Sent point {} as {}", index, frame);
                    Cycle::Sent { index, frame }
                }
            },
        };

        if !matches!(cycle, Cycle::Sent { .. }) {
            self.idle();
        }
        Ok(cycle)
    }

    /// Reopen the channel after `error`, honouring the reconnect policy
    fn recover(&mut self, error: ConnectionError) -> Result<(), ConnectionError> {
        let attempts = self.config.reconnect_attempts;
        let Some(connector) = self.connector.as_mut() else {
            return Err(error);
        };
        if attempts == 0 {
            return Err(error);
        }

        tracing::warn!("Channel failed ({}), reconnecting", error);
        let port = self.link.name();
        for attempt in 1..=attempts {
            if self.shutdown.load(Ordering::Acquire) {
                return Err(error);
            }
            thread::sleep(self.config.reconnect_delay);

            match connector() {
                Ok(link) => {
                    tracing::info!("Reconnected to {} on attempt {}", port, attempt);
                    self.link = link;
                    self.status.write().state = TransmitterState::AwaitingHandshake;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Reconnect attempt {}/{} failed: {}", attempt, attempts, e);
                }
            }
        }

        Err(ConnectionError::ReconnectExhausted { port, attempts })
    }

    /// Run until shutdown or an unrecoverable channel failure
    pub fn run(mut self) -> TransmitterReport {
        tracing::info!(
            "Transmitter started on {} (trigger 0x{:02X}, range policy {})",
            self.link.name(),
            self.config.trigger_byte,
            self.config.range_policy
        );
        self.set_state(TransmitterState::AwaitingHandshake);

        let error = loop {
            if self.shutdown.load(Ordering::Acquire) {
                break None;
            }
            if let Err(e) = self.step() {
                if let Err(fatal) = self.recover(e) {
                    break Some(fatal);
                }
            }
        };

        match &error {
            Some(e) => {
                self.set_state(TransmitterState::Faulted);
                tracing::error!("Transmitter faulted after {} points: {}", self.cursor, e);
            }
            None => {
                self.set_state(TransmitterState::Stopped);
                tracing::info!("Transmitter stopped after {} points", self.cursor);
            }
        }

        TransmitterReport {
            status: self.status(),
            error,
        }
    }

    /// Run the loop on its own named thread
    pub fn spawn(self) -> io::Result<TransmitterHandle> {
        let status = self.status.clone();
        let shutdown = self.shutdown.clone();
        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || self.run())?;

        Ok(TransmitterHandle {
            thread,
            status,
            shutdown,
        })
    }
}

/// Handle to a transmitter running on its own thread
pub struct TransmitterHandle {
    thread: JoinHandle<TransmitterReport>,
    status: ThreadSafeRw<TransmitterStatus>,
    shutdown: ShutdownFlag,
}

impl TransmitterHandle {
    /// Current state of the loop
    pub fn state(&self) -> TransmitterState {
        self.status.read().state
    }

    /// Snapshot of the live counters
    pub fn status(&self) -> TransmitterStatus {
        self.status.read().clone()
    }

    /// Number of points consumed from the log so far
    pub fn cursor(&self) -> usize {
        self.status.read().cursor
    }

    /// Whether the loop has ended
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Ask the loop to stop after the current read
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Wait for the loop to end
    pub fn join(self) -> TransmitterReport {
        match self.thread.join() {
            Ok(report) => report,
            Err(_) => {
                let mut status = self.status.read().clone();
                status.state = TransmitterState::Faulted;
                TransmitterReport {
                    status,
                    error: Some(ConnectionError::Io {
                        port: THREAD_NAME.to_string(),
                        reason: "transmitter thread panicked".to_string(),
                    }),
                }
            }
        }
    }

    /// Stop the loop and wait for it
    pub fn stop(self) -> TransmitterReport {
        self.shutdown();
        self.join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use vectorlink_core::Coordinate;

    /// Link fed from a fixed byte script; writes recorded
    struct ScriptLink {
        inbound: VecDeque<u8>,
        written: Arc<Mutex<Vec<String>>>,
    }

    impl SerialLink for ScriptLink {
        fn read_byte(&mut self) -> io::Result<Option<u8>> {
            Ok(self.inbound.pop_front())
        }

        fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
            self.written
                .lock()
                .unwrap()
                .push(String::from_utf8_lossy(frame).to_string());
            Ok(())
        }

        fn name(&self) -> String {
            "script".to_string()
        }
    }

    fn transmitter(script: &[u8], log: PointLog) -> (SerialTransmitter, Arc<Mutex<Vec<String>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let link = ScriptLink {
            inbound: script.iter().copied().collect(),
            written: written.clone(),
        };
        let config = TransmitterConfig {
            poll_interval: Duration::ZERO,
            ..TransmitterConfig::default()
        };
        (SerialTransmitter::new(Box::new(link), log, config), written)
    }

    #[test]
    fn test_state_terminal() {
        assert!(!TransmitterState::AwaitingHandshake.is_terminal());
        assert!(!TransmitterState::Transmitting.is_terminal());
        assert!(TransmitterState::Faulted.is_terminal());
        assert!(TransmitterState::Stopped.is_terminal());
    }

    #[test]
    fn test_step_cycles() {
        let log = PointLog::new();
        log.append(Coordinate::vector_start(10, 20));
        let (mut tx, written) = transmitter(&[b'x', 13, 13], log);

        assert_eq!(tx.step().unwrap(), Cycle::Ignored(b'x'));
        assert_eq!(
            tx.step().unwrap(),
            Cycle::Sent {
                index: 0,
                frame: "v0x0A1401".to_string()
            }
        );
        assert_eq!(tx.step().unwrap(), Cycle::Unserved);
        assert_eq!(tx.step().unwrap(), Cycle::Idle);

        assert_eq!(written.lock().unwrap().as_slice(), ["v0x0A1401"]);
        let status = tx.status();
        assert_eq!(status.points_sent, 1);
        assert_eq!(status.bytes_ignored, 1);
        assert_eq!(status.handshakes_unserved, 1);
        assert_eq!(status.state, TransmitterState::AwaitingHandshake);
    }

    #[test]
    fn test_rejected_point_is_skipped_within_one_handshake() {
        let log = PointLog::new();
        log.append(Coordinate::vector_start(400, 0));
        log.append(Coordinate::vector_end(1, 2));
        let (mut tx, written) = transmitter(&[13], log);

        assert_eq!(
            tx.step().unwrap(),
            Cycle::Sent {
                index: 1,
                frame: "v0x010200".to_string()
            }
        );
        assert_eq!(tx.cursor(), 2);
        assert_eq!(tx.status().points_rejected, 1);
        assert_eq!(written.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_shutdown_before_run() {
        let (tx, _) = transmitter(&[], PointLog::new());
        tx.shutdown_flag().store(true, Ordering::Release);

        let report = tx.run();
        assert_eq!(report.status.state, TransmitterState::Stopped);
        assert!(report.error.is_none());
    }
}
