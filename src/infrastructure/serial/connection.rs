//! Serial Connection Module
//!
//! Opens the SPP serial port and splits it into an owned reader half, which
//! is moved into the read loop, and an owned writer half, which sends drive
//! commands.

use crate::domain::models::AppEvent;
use crate::infrastructure::serial::protocol::{self, DriveCommand, FrameError};
use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("device {0:?} not found among paired devices")]
    DeviceNotFound(String),
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(#[source] serialport::Error),
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
}

/// Configuration for opening the link
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub port_name: String,
    pub baud_rate: u32,
    /// Bounds each blocking read so the loop can notice a stop request
    pub read_timeout: Duration,
}

/// An open serial connection to the device
pub struct SerialLink {
    port_name: String,
    reader: Box<dyn SerialPort>,
    writer: Box<dyn SerialPort>,
}

impl SerialLink {
    pub fn open(config: &LinkConfig) -> Result<Self, LinkError> {
        info!(
            "Opening serial port {} at {} baud",
            config.port_name, config.baud_rate
        );

        let open_error = |source| LinkError::Open {
            port: config.port_name.clone(),
            source,
        };

        let writer = serialport::new(&config.port_name, config.baud_rate)
            .timeout(config.read_timeout)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .open()
            .map_err(open_error)?;
        let reader = writer.try_clone().map_err(open_error)?;

        Ok(Self {
            port_name: config.port_name.clone(),
            reader,
            writer,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Hand out the two halves; each has exactly one owner from here on
    pub fn split(self) -> (Box<dyn SerialPort>, CommandSender<Box<dyn SerialPort>>) {
        let sender = CommandSender::new(self.writer, self.port_name);
        (self.reader, sender)
    }
}

/// Settings for the background read loop
#[derive(Debug, Clone, Copy)]
pub struct ReadLoopConfig {
    pub buffer_size: usize,
    /// Pause after each successful read
    pub interval: Duration,
}

impl Default for ReadLoopConfig {
    fn default() -> Self {
        Self {
            buffer_size: protocol::READ_BUFFER_SIZE,
            interval: Duration::from_millis(protocol::READ_INTERVAL_MS),
        }
    }
}

/// Why the read loop ended
#[derive(Debug)]
pub enum ReadLoopExit {
    /// A disconnect was requested or the UI went away
    Stopped,
    /// The peer closed the stream
    EndOfStream,
    Failed(io::Error),
}

/// Reads frames until the stream fails, ends, or `stop` is raised.
///
/// Each successful read is treated as one frame. Parsed readings are posted
/// to `events`; frames that do not parse are dropped.
pub fn run_read_loop<R: Read>(
    reader: &mut R,
    config: ReadLoopConfig,
    stop: &AtomicBool,
    events: &mpsc::UnboundedSender<AppEvent>,
) -> ReadLoopExit {
    let mut buffer = vec![0u8; config.buffer_size.max(1)];

    loop {
        if stop.load(Ordering::Acquire) {
            return ReadLoopExit::Stopped;
        }

        let bytes = match reader.read(&mut buffer) {
            Ok(0) => return ReadLoopExit::EndOfStream,
            Ok(n) => n,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                ) =>
            {
                continue
            }
            Err(e) => {
                error!("Error reading from serial stream: {}", e);
                return ReadLoopExit::Failed(e);
            }
        };

        match protocol::parse_frame(&buffer[..bytes]) {
            Ok(reading) => {
                trace!("Reading: {:?}", reading);
                if events.send(AppEvent::Reading(reading)).is_err() {
                    debug!("Event receiver dropped, stopping read loop");
                    return ReadLoopExit::Stopped;
                }
            }
            Err(FrameError::NoReading) => trace!("Device reported no reading"),
            Err(e) => debug!(
                "Dropping frame {:?}: {}",
                String::from_utf8_lossy(&buffer[..bytes]),
                e
            ),
        }

        if sleep_unless_stopped(config.interval, stop) {
            return ReadLoopExit::Stopped;
        }
    }
}

/// Longest uninterrupted nap inside the read throttle
const STOP_POLL: Duration = Duration::from_millis(20);

/// Sleep for `interval`, returning early (and `true`) once `stop` is raised
fn sleep_unless_stopped(interval: Duration, stop: &AtomicBool) -> bool {
    let deadline = Instant::now() + interval;
    loop {
        if stop.load(Ordering::Acquire) {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        std::thread::sleep(STOP_POLL.min(deadline - now));
    }
}

/// Writes drive commands to the device. Fire-and-forget: failures are logged only.
pub struct CommandSender<W: Write> {
    writer: W,
    port_name: String,
}

impl<W: Write> CommandSender<W> {
    pub fn new(writer: W, port_name: impl Into<String>) -> Self {
        Self {
            writer,
            port_name: port_name.into(),
        }
    }

    pub fn send(&mut self, command: DriveCommand) {
        let result = self
            .writer
            .write_all(command.as_bytes())
            .and_then(|_| self.writer.flush());

        match result {
            Ok(()) => debug!("Sent command {} to {}", command, self.port_name),
            Err(e) => warn!("Error sending command {} to {}: {}", command, self.port_name, e),
        }
    }

    /// Flush and release the writer half
    pub fn close(mut self) {
        if let Err(e) = self.writer.flush() {
            warn!("Error closing {}: {}", self.port_name, e);
        }
        info!("Closed {}", self.port_name);
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}
