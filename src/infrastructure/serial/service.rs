//! Link Service Module
//!
//! Owns the serial link on a dedicated worker thread. The UI talks to it
//! through [`LinkCommand`]s and hears back through [`AppEvent`]s.

use crate::domain::models::{
    AppEvent, ConnectionStatus, LinkCommand, MessageSeverity, StatusMessage,
};
use crate::domain::settings::SettingsService;
use crate::infrastructure::serial::{
    connection::{
        run_read_loop, CommandSender, LinkConfig, ReadLoopConfig, ReadLoopExit, SerialLink,
    },
    discovery,
    protocol::DriveCommand,
};
use anyhow::Result;
use serialport::SerialPort;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// UI-side handle to the link worker thread
pub struct LinkHandle {
    commands: Option<mpsc::UnboundedSender<LinkCommand>>,
    worker: Option<JoinHandle<()>>,
}

impl LinkHandle {
    pub fn send(&self, cmd: LinkCommand) {
        if let Some(commands) = &self.commands {
            let _ = commands.send(cmd);
        }
    }

    /// Close the command channel and wait up to `timeout` for the worker to
    /// release the link. Returns false if the worker did not finish in time.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        self.commands = None;
        let Some(worker) = self.worker.take() else {
            return true;
        };

        let deadline = Instant::now() + timeout;
        while !worker.is_finished() {
            if Instant::now() >= deadline {
                warn!("Serial link worker did not stop within {:?}", timeout);
                return false;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        if worker.join().is_err() {
            error!("Serial link worker panicked");
        }
        true
    }
}

/// Main service coordinating the serial link
pub struct LinkService {
    sender: Option<CommandSender<Box<dyn SerialPort>>>,
    reader_stop: Option<Arc<AtomicBool>>,
    reader_task: Option<JoinHandle<()>>,
    event_sender: mpsc::UnboundedSender<AppEvent>,
    settings: Arc<Mutex<SettingsService>>,
}

impl LinkService {
    pub fn new(
        event_sender: mpsc::UnboundedSender<AppEvent>,
        settings: Arc<Mutex<SettingsService>>,
    ) -> Self {
        Self {
            sender: None,
            reader_stop: None,
            reader_task: None,
            event_sender,
            settings,
        }
    }

    /// Start the worker thread and return the handle that drives it
    pub fn spawn(
        event_sender: mpsc::UnboundedSender<AppEvent>,
        settings: Arc<Mutex<SettingsService>>,
    ) -> LinkHandle {
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();

        let worker = std::thread::spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime for serial link: {}", e);
                    return;
                }
            };

            rt.block_on(async move {
                let mut service = LinkService::new(event_sender, settings);
                while let Some(cmd) = cmd_rx.recv().await {
                    service.handle(cmd);
                }
                service.disconnect();
            });
        });

        LinkHandle {
            commands: Some(cmd_tx),
            worker: Some(worker),
        }
    }

    pub fn handle(&mut self, cmd: LinkCommand) {
        self.reap_reader();
        match cmd {
            LinkCommand::Connect => {
                if let Err(e) = self.connect() {
                    error!("Connection failed: {:#}", e);
                    self.send_log(format!("Connection failed: {:#}", e), MessageSeverity::Error);
                    self.send_status(ConnectionStatus::Error);
                }
            }
            LinkCommand::Disconnect => self.disconnect(),
            LinkCommand::Send(command) => self.send(command),
        }
    }

    /// Find the device, open the port, and start the read loop
    pub fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            warn!("Already connected, ignoring connect request");
            self.send_status(ConnectionStatus::Connected);
            return Ok(());
        }

        self.send_status(ConnectionStatus::Connecting);

        let settings = self
            .settings
            .lock()
            .map_err(|_| anyhow::anyhow!("Lock error"))?
            .get()
            .clone();

        let port_name = discovery::resolve_port(&settings)?;
        self.send_log(format!("Connecting to {}...", port_name), MessageSeverity::Info);

        let link = SerialLink::open(&LinkConfig {
            port_name: port_name.clone(),
            baud_rate: settings.baud_rate,
            read_timeout: Duration::from_millis(settings.read_timeout_ms.max(1)),
        })?;
        info!("Connected to {}", link.port_name());
        let (mut reader, sender) = link.split();

        let read_config = ReadLoopConfig {
            buffer_size: settings.read_buffer_size,
            interval: Duration::from_millis(settings.read_interval_ms),
        };
        let stop = Arc::new(AtomicBool::new(false));
        let reader_stop = stop.clone();
        let events = self.event_sender.clone();

        let task = std::thread::Builder::new()
            .name("serial-reader".to_string())
            .spawn(move || {
                let exit = run_read_loop(&mut reader, read_config, &reader_stop, &events);
                report_read_loop_exit(exit, &events);
            })?;

        self.sender = Some(sender);
        self.reader_stop = Some(stop);
        self.reader_task = Some(task);

        if let Ok(mut settings) = self.settings.lock() {
            if let Err(e) = settings.set_last_connected_port(&port_name) {
                warn!("Could not remember port {}: {}", port_name, e);
            }
        }

        self.send_log(format!("Connected to {}", port_name), MessageSeverity::Success);
        self.send_status(ConnectionStatus::Connected);
        Ok(())
    }

    /// Stop the read loop and close the writer
    pub fn disconnect(&mut self) {
        let was_connected = self.sender.is_some();
        self.release();

        if was_connected {
            info!("Disconnected from device");
            self.send_log("Disconnected from device", MessageSeverity::Info);
            self.send_status(ConnectionStatus::Disconnected);
        }
    }

    pub fn send(&mut self, command: DriveCommand) {
        match self.sender.as_mut() {
            Some(sender) => sender.send(command),
            None => warn!("Not connected, dropping command {}", command),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.sender.is_some()
    }

    /// Drop the writer once the reader has ended on its own
    fn reap_reader(&mut self) {
        let finished = self
            .reader_task
            .as_ref()
            .map_or(false, |task| task.is_finished());
        if finished {
            self.release();
        }
    }

    /// Close both halves. Returns once the reader thread has dropped its
    /// port handle, so the port can be reopened right away.
    fn release(&mut self) {
        if let Some(stop) = self.reader_stop.take() {
            stop.store(true, Ordering::Release);
        }
        if let Some(sender) = self.sender.take() {
            sender.close();
        }
        // Bounded by one read timeout
        if let Some(task) = self.reader_task.take() {
            if task.join().is_err() {
                error!("Serial reader thread panicked");
            }
        }
    }

    fn send_status(&self, status: ConnectionStatus) {
        let _ = self.event_sender.send(AppEvent::ConnectionStatus(status));
    }

    fn send_log(&self, message: impl Into<String>, severity: MessageSeverity) {
        let _ = self
            .event_sender
            .send(AppEvent::LogMessage(StatusMessage::new(message, severity)));
    }
}

fn report_read_loop_exit(exit: ReadLoopExit, events: &mpsc::UnboundedSender<AppEvent>) {
    let message = match exit {
        ReadLoopExit::Stopped => return,
        ReadLoopExit::EndOfStream => {
            info!("Device closed the connection");
            StatusMessage::new("Device closed the connection", MessageSeverity::Warning)
        }
        ReadLoopExit::Failed(e) => StatusMessage::new(
            format!("Lost connection: {}", e),
            MessageSeverity::Error,
        ),
    };
    let _ = events.send(AppEvent::LogMessage(message));
    let _ = events.send(AppEvent::ConnectionStatus(ConnectionStatus::Disconnected));
}
