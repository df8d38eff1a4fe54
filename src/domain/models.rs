use crate::infrastructure::serial::protocol::DriveCommand;

/// One decoded distance/bearing pair. Replaces the previous reading on display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub distance: f64,
    /// Degrees, nominally in [0, 360)
    pub bearing: f64,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    Reading(Reading),
    ConnectionStatus(ConnectionStatus),
    LogMessage(StatusMessage),
}

/// Requests from the UI thread to the link worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCommand {
    Connect,
    Disconnect,
    Send(DriveCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub severity: MessageSeverity,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>, severity: MessageSeverity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Radar,
    Settings,
}
