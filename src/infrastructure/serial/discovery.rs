//! Device Discovery Module
//!
//! Finds the serial port the OS bound to the paired HC-05. Pairing itself is
//! done by the OS; trusted SPP peers show up as serial ports (for example
//! `/dev/cu.HC-05-DevB` on macOS or `COM5` on Windows). On Linux the port is
//! usually an `rfcomm` device and has to be configured explicitly.

use crate::domain::settings::Settings;
use crate::infrastructure::serial::connection::LinkError;
use serialport::{SerialPortInfo, SerialPortType};
use tracing::{debug, info};

/// Pick the port belonging to `device_name` among the enumerated ports
pub fn select_port<'a>(ports: &'a [SerialPortInfo], device_name: &str) -> Option<&'a SerialPortInfo> {
    let needle = device_name.to_lowercase();
    let is_match = |port: &&SerialPortInfo| {
        if port.port_name.to_lowercase().contains(&needle) {
            return true;
        }
        match &port.port_type {
            SerialPortType::UsbPort(usb) => usb
                .product
                .as_deref()
                .map_or(false, |p| p.to_lowercase().contains(&needle)),
            _ => false,
        }
    };

    ports
        .iter()
        .filter(is_match)
        .find(|p| matches!(p.port_type, SerialPortType::BluetoothPort))
        .or_else(|| ports.iter().find(is_match))
}

/// Resolve which port to open: the configured one, or the one discovered by name
pub fn resolve_port(settings: &Settings) -> Result<String, LinkError> {
    if let Some(port) = settings.port_name.as_ref().filter(|p| !p.trim().is_empty()) {
        info!("Using configured serial port {}", port);
        return Ok(port.clone());
    }

    info!("Looking for paired device {:?}", settings.device_name);
    let ports = serialport::available_ports().map_err(LinkError::Enumerate)?;
    for port in &ports {
        debug!("Found port {} ({:?})", port.port_name, port.port_type);
    }

    select_port(&ports, &settings.device_name)
        .map(|p| p.port_name.clone())
        .ok_or_else(|| LinkError::DeviceNotFound(settings.device_name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(name: &str, port_type: SerialPortType) -> SerialPortInfo {
        SerialPortInfo {
            port_name: name.to_string(),
            port_type,
        }
    }

    #[test]
    fn test_select_by_port_name() {
        let ports = vec![
            port("/dev/cu.Bluetooth-Incoming-Port", SerialPortType::Unknown),
            port("/dev/cu.HC-05-DevB", SerialPortType::Unknown),
        ];
        let found = select_port(&ports, "HC-05").unwrap();
        assert_eq!(found.port_name, "/dev/cu.HC-05-DevB");
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let ports = vec![port("/dev/tty.hc-05", SerialPortType::Unknown)];
        assert!(select_port(&ports, "HC-05").is_some());
    }

    #[test]
    fn test_bluetooth_ports_are_preferred() {
        let ports = vec![
            port("/dev/cu.HC-05-usb", SerialPortType::Unknown),
            port("/dev/cu.HC-05-DevB", SerialPortType::BluetoothPort),
        ];
        let found = select_port(&ports, "HC-05").unwrap();
        assert_eq!(found.port_name, "/dev/cu.HC-05-DevB");
    }

    #[test]
    fn test_no_match() {
        let ports = vec![port("/dev/ttyS0", SerialPortType::BluetoothPort)];
        assert!(select_port(&ports, "HC-05").is_none());
        assert!(select_port(&[], "HC-05").is_none());
    }

    #[test]
    fn test_configured_port_skips_discovery() {
        let settings = Settings {
            port_name: Some("/dev/rfcomm0".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_port(&settings).unwrap(), "/dev/rfcomm0");
    }
}
