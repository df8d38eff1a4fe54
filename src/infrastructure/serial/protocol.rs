//! HC-05 Radar Protocol
//!
//! Text telemetry frames coming from the device and the single-byte drive
//! commands going to it.
//!
//! # Inbound frame
//!
//! ```text
//! <distance>:<bearing>,<ignored>...
//! ```
//!
//! Only the segment before the first `,` is consumed. A distance token
//! containing `null` means the sensor saw nothing this cycle.

use crate::domain::models::Reading;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

/// Serial Port Profile service class UUID
pub const SPP_SERVICE_UUID: &str = "00001101-0000-1000-8000-00805F9B34FB";

/// Name the module advertises to trusted peers
pub const DEVICE_NAME: &str = "HC-05";

/// HC-05 factory baud rate
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Size of one read from the serial stream
pub const READ_BUFFER_SIZE: usize = 1024;

/// Pause after each successful read in milliseconds
pub const READ_INTERVAL_MS: u64 = 1000;

const SEGMENT_DELIMITER: char = ',';
const FIELD_DELIMITER: char = ':';
const NO_READING_SENTINEL: &str = "null";

/// Why a frame did not produce a reading
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("empty frame")]
    Empty,
    #[error("frame has no bearing field")]
    MissingBearing,
    #[error("device reported no reading")]
    NoReading,
    #[error("invalid {field} value {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Parse one raw chunk read from the serial stream
pub fn parse_frame(bytes: &[u8]) -> Result<Reading, FrameError> {
    let text = String::from_utf8_lossy(bytes);
    parse_frame_str(&text)
}

/// Parse a frame that is already text
pub fn parse_frame_str(text: &str) -> Result<Reading, FrameError> {
    if text.trim().is_empty() {
        return Err(FrameError::Empty);
    }

    let segment = text.split(SEGMENT_DELIMITER).next().unwrap_or_default();
    let mut fields = segment.split(FIELD_DELIMITER);
    let raw_distance = fields.next().unwrap_or_default();
    trace!("Raw distance token: {:?}", raw_distance);

    if raw_distance.contains(NO_READING_SENTINEL) {
        return Err(FrameError::NoReading);
    }

    let raw_bearing = fields.next().ok_or(FrameError::MissingBearing)?;

    Ok(Reading {
        distance: parse_field("distance", raw_distance)?,
        bearing: parse_field("bearing", raw_bearing)?,
    })
}

fn parse_field(field: &'static str, raw: &str) -> Result<f64, FrameError> {
    let invalid = || FrameError::InvalidNumber {
        field,
        value: raw.to_string(),
    };

    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}

/// Drive commands understood by the vehicle firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveCommand {
    Forward,
    Back,
    Left,
    Right,
    /// Sent when any directional control is released
    Stop,
}

impl DriveCommand {
    pub fn as_char(&self) -> char {
        match self {
            Self::Forward => 'F',
            Self::Back => 'B',
            Self::Left => 'L',
            Self::Right => 'R',
            Self::Stop => 'S',
        }
    }

    /// Get the raw bytes for this command
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Forward => b"F",
            Self::Back => b"B",
            Self::Left => b"L",
            Self::Right => b"R",
            Self::Stop => b"S",
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'F' => Some(Self::Forward),
            'B' => Some(Self::Back),
            'L' => Some(Self::Left),
            'R' => Some(Self::Right),
            'S' => Some(Self::Stop),
            _ => None,
        }
    }
}

impl fmt::Display for DriveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown drive command {0:?}")]
pub struct UnknownCommand(pub String);

impl FromStr for DriveCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| UnknownCommand(s.to_string())),
            _ => Err(UnknownCommand(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(distance: f64, bearing: f64) -> Reading {
        Reading { distance, bearing }
    }

    fn parse_reading(bytes: &[u8]) -> Option<Reading> {
        parse_frame(bytes).ok()
    }

    #[test]
    fn test_parse_well_formed_frame() {
        assert_eq!(parse_reading(b"12.5:90,x"), Some(reading(12.5, 90.0)));
        assert_eq!(parse_reading(b"0:0"), Some(reading(0.0, 0.0)));
    }

    #[test]
    fn test_only_first_segment_matters() {
        assert_eq!(parse_frame(b"10:20,99:99"), parse_frame(b"10:20"));
        assert_eq!(parse_reading(b"10:20,null:5,garbage"), Some(reading(10.0, 20.0)));
    }

    #[test]
    fn test_null_sentinel() {
        assert_eq!(parse_frame(b"null:0,x"), Err(FrameError::NoReading));
        assert_eq!(parse_frame(b"nullnull"), Err(FrameError::NoReading));
        assert_eq!(parse_reading(b" null :45"), None);
    }

    #[test]
    fn test_malformed_frames_are_rejected() {
        assert_eq!(parse_frame(b""), Err(FrameError::Empty));
        assert_eq!(parse_frame(b"\r\n"), Err(FrameError::Empty));
        assert_eq!(parse_frame(b"42"), Err(FrameError::MissingBearing));
        assert_eq!(parse_frame(b",10:20"), Err(FrameError::MissingBearing));
        assert!(matches!(
            parse_frame(b"abc:90,x"),
            Err(FrameError::InvalidNumber { field: "distance", .. })
        ));
        assert!(matches!(
            parse_frame(b"10:,x"),
            Err(FrameError::InvalidNumber { field: "bearing", .. })
        ));
        assert_eq!(parse_reading(b"inf:10"), None);
        assert_eq!(parse_reading(&[0xFF, 0xFE, b':', b'1']), None);
    }

    #[test]
    fn test_line_endings_are_trimmed() {
        assert_eq!(parse_reading(b"35:270\r\n"), Some(reading(35.0, 270.0)));
        assert_eq!(parse_reading(b" 7 : 15 ,"), Some(reading(7.0, 15.0)));
    }

    #[test]
    fn test_values_are_passed_through_unvalidated() {
        assert_eq!(parse_reading(b"-3:400"), Some(reading(-3.0, 400.0)));
    }

    #[test]
    fn test_extra_colon_fields_are_ignored() {
        assert_eq!(parse_reading(b"1:2:3"), Some(reading(1.0, 2.0)));
    }

    #[test]
    fn test_command_bytes() {
        assert_eq!(DriveCommand::Forward.as_bytes(), &[0x46]);
        assert_eq!(DriveCommand::Stop.as_bytes(), &[0x53]);
        let all = [
            DriveCommand::Forward,
            DriveCommand::Back,
            DriveCommand::Left,
            DriveCommand::Right,
            DriveCommand::Stop,
        ];
        for command in all {
            let text = std::str::from_utf8(command.as_bytes()).unwrap();
            assert_eq!(text.parse::<DriveCommand>(), Ok(command));
            assert_eq!(command.to_string(), text);
        }
    }

    #[test]
    fn test_unknown_command() {
        assert!("X".parse::<DriveCommand>().is_err());
        assert!("FB".parse::<DriveCommand>().is_err());
        assert!("".parse::<DriveCommand>().is_err());
    }
}
