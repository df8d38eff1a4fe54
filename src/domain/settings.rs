use crate::infrastructure::serial::protocol;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_true")]
    pub file_logging_enabled: bool,
    #[serde(default = "default_true")]
    pub console_logging_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_prefix")]
    pub file_name_prefix: String,
    #[serde(default = "default_false")]
    pub show_file_line: bool,
    #[serde(default = "default_false")]
    pub show_thread_ids: bool,
    #[serde(default = "default_true")]
    pub show_target: bool,
    #[serde(default = "default_true")]
    pub ansi_colors: bool,
    #[serde(default = "default_rotation")]
    pub rotation: String, // "daily", "hourly", "minutely", "never"
    #[serde(default = "default_max_log_files")]
    pub max_log_files: usize,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file_logging_enabled: default_true(),
            console_logging_enabled: default_true(),
            log_dir: default_log_dir(),
            file_name_prefix: default_prefix(),
            show_file_line: default_false(),
            show_thread_ids: default_false(),
            show_target: default_true(),
            ansi_colors: default_true(),
            rotation: default_rotation(),
            max_log_files: default_max_log_files(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_prefix() -> String {
    "hc05_radar".to_string()
}
fn default_rotation() -> String {
    "daily".to_string()
}
fn default_max_log_files() -> usize {
    7
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // Device
    #[serde(default = "default_device_name")]
    pub device_name: String,
    /// Skips discovery when set (e.g. "/dev/rfcomm0" or "COM5")
    #[serde(default)]
    pub port_name: Option<String>,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_service_uuid")]
    pub service_uuid: String,
    #[serde(default)]
    pub last_connected_port: Option<String>,

    // Read loop
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
    #[serde(default = "default_read_interval_ms")]
    pub read_interval_ms: u64,
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    // Drive pad
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,

    // Radar display
    #[serde(default = "default_radar_baseline")]
    pub radar_baseline: f32,
    #[serde(default = "default_false")]
    pub dark_mode: bool,

    // Logging Settings
    #[serde(default)]
    pub log_settings: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            port_name: None,
            baud_rate: default_baud_rate(),
            service_uuid: default_service_uuid(),
            last_connected_port: None,
            read_buffer_size: default_read_buffer_size(),
            read_interval_ms: default_read_interval_ms(),
            read_timeout_ms: default_read_timeout_ms(),
            long_press_ms: default_long_press_ms(),
            radar_baseline: default_radar_baseline(),
            dark_mode: false,
            log_settings: LogSettings::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.device_name.trim().is_empty() && self.port_name.is_none() {
            anyhow::bail!("Either a device name or a port name is required");
        }
        if self.baud_rate == 0 {
            anyhow::bail!("Baud rate must be positive");
        }
        if self.read_buffer_size == 0 {
            anyhow::bail!("Read buffer size must be positive");
        }
        if self.radar_baseline <= 0.0 {
            anyhow::bail!("Radar baseline must be positive");
        }
        uuid::Uuid::parse_str(&self.service_uuid)
            .map_err(|e| anyhow::anyhow!("Invalid service UUID {}: {}", self.service_uuid, e))?;
        Ok(())
    }
}

fn default_device_name() -> String {
    protocol::DEVICE_NAME.to_string()
}
fn default_baud_rate() -> u32 {
    protocol::DEFAULT_BAUD_RATE
}
fn default_service_uuid() -> String {
    protocol::SPP_SERVICE_UUID.to_string()
}
fn default_read_buffer_size() -> usize {
    protocol::READ_BUFFER_SIZE
}
fn default_read_interval_ms() -> u64 {
    protocol::READ_INTERVAL_MS
}
fn default_read_timeout_ms() -> u64 {
    500
}
fn default_long_press_ms() -> u64 {
    500
}
fn default_radar_baseline() -> f32 {
    350.0
}

pub struct SettingsService {
    settings: Settings,
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Ok(Self::with_path(settings_path))
    }

    /// Load from an explicit path, falling back to defaults if it is missing or unreadable
    pub fn with_path(settings_path: PathBuf) -> Self {
        let settings = match Self::load_from_file(&settings_path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::debug!(
                    "Using default settings ({}): {}",
                    settings_path.display(),
                    e
                );
                Settings::default()
            }
        };

        Self {
            settings,
            settings_path,
        }
    }

    fn get_settings_path() -> anyhow::Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        path.push("HC05Radar");
        path.push("settings.json");
        Ok(path)
    }

    fn load_from_file(path: &Path) -> anyhow::Result<Settings> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.write_file(&self.settings)
    }

    fn write_file(&self, settings: &Settings) -> anyhow::Result<()> {
        settings.validate()?;
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.settings_path, json)?;
        Ok(())
    }

    /// Replace the live settings with an edited copy.
    ///
    /// The copy is validated and written first; on error nothing changes.
    /// `last_connected_port` is owned by the link and is kept as is.
    pub fn apply(&mut self, mut draft: Settings) -> anyhow::Result<()> {
        draft.last_connected_port = self.settings.last_connected_port.clone();
        self.write_file(&draft)?;
        self.settings = draft;
        Ok(())
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    pub fn set_last_connected_port(&mut self, port: &str) -> anyhow::Result<()> {
        if self.settings.last_connected_port.as_deref() != Some(port) {
            self.settings.last_connected_port = Some(port.to_string());
            self.save()?;
        }
        Ok(())
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) -> anyhow::Result<()> {
        if self.settings.dark_mode != dark_mode {
            self.settings.dark_mode = dark_mode;
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_device() {
        let settings = Settings::default();
        assert_eq!(settings.device_name, "HC-05");
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.read_buffer_size, 1024);
        assert_eq!(settings.read_interval_ms, 1000);
        assert_eq!(settings.service_uuid, "00001101-0000-1000-8000-00805F9B34FB");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"port_name": "/dev/rfcomm0"}"#).unwrap();
        assert_eq!(settings.port_name.as_deref(), Some("/dev/rfcomm0"));
        assert_eq!(settings.device_name, "HC-05");
        assert_eq!(settings.log_settings, LogSettings::default());
    }

    #[test]
    fn test_invalid_settings() {
        let mut settings = Settings::default();
        settings.service_uuid = "not-a-uuid".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.baud_rate = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.device_name = String::new();
        assert!(settings.validate().is_err());
        settings.port_name = Some("COM5".to_string());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut service = SettingsService::with_path(path.clone());
        assert_eq!(service.get(), &Settings::default());

        service.get_mut().baud_rate = 38400;
        service.set_last_connected_port("/dev/rfcomm0").unwrap();

        let reloaded = SettingsService::with_path(path);
        assert_eq!(reloaded.get().baud_rate, 38400);
        assert_eq!(
            reloaded.get().last_connected_port.as_deref(),
            Some("/dev/rfcomm0")
        );
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "{ not json").unwrap();
        let service = SettingsService::with_path(file.path().to_path_buf());
        assert_eq!(service.get(), &Settings::default());
    }

    #[test]
    fn test_rejected_draft_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut service = SettingsService::with_path(path.clone());
        service.save().unwrap();
        let on_disk = fs::read_to_string(&path).unwrap();

        let mut draft = service.get().clone();
        draft.baud_rate = 0;
        draft.device_name = "Rover".to_string();
        assert!(service.apply(draft).is_err());
        assert_eq!(service.get(), &Settings::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), on_disk);

        // Later link-side saves must not pick up the rejected edits
        service.set_last_connected_port("/dev/rfcomm0").unwrap();
        let reloaded = SettingsService::with_path(path);
        assert_eq!(reloaded.get().device_name, "HC-05");
        assert_eq!(reloaded.get().baud_rate, 9600);
    }

    #[test]
    fn test_apply_persists_draft() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut service = SettingsService::with_path(path.clone());
        service.set_last_connected_port("/dev/rfcomm1").unwrap();

        let mut draft = Settings::default();
        draft.baud_rate = 115200;
        service.apply(draft).unwrap();

        assert_eq!(service.get().baud_rate, 115200);
        assert_eq!(service.get().last_connected_port.as_deref(), Some("/dev/rfcomm1"));
        let reloaded = SettingsService::with_path(path);
        assert_eq!(reloaded.get(), service.get());
    }
}
