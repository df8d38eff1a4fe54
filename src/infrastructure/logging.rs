use crate::domain::settings::LogSettings;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Keeps the file writer alive; dropping it flushes pending log lines
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

fn parse_rotation(rotation: &str) -> Rotation {
    match rotation.to_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "minutely" => Rotation::MINUTELY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

/// Relative log directories live under the per-user data directory
fn resolve_log_dir(log_dir: &str, data_dir: Option<PathBuf>) -> PathBuf {
    let dir = Path::new(log_dir);
    match data_dir {
        Some(base) if dir.is_relative() => base.join("HC05Radar").join(dir),
        _ => dir.to_path_buf(),
    }
}

fn file_writer(settings: &LogSettings, dir: &Path) -> anyhow::Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(parse_rotation(&settings.rotation))
        .filename_prefix(&settings.file_name_prefix)
        .filename_suffix("log")
        .max_log_files(settings.max_log_files.max(1))
        .build(dir)?;
    Ok(appender)
}

/// Event format shared by the console and file outputs
fn formatted<S>(settings: &LogSettings) -> fmt::Layer<S> {
    fmt::layer()
        .with_file(settings.show_file_line)
        .with_line_number(settings.show_file_line)
        .with_thread_ids(settings.show_thread_ids)
        .with_target(settings.show_target)
}

fn level_filter(settings: &LogSettings) -> EnvFilter {
    // RUST_LOG wins over the configured level
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::from_str(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logger(settings: &LogSettings) -> anyhow::Result<LoggingGuard> {
    let console_layer = settings.console_logging_enabled.then(|| {
        formatted(settings)
            .with_writer(std::io::stdout)
            .with_ansi(settings.ansi_colors)
    });

    let mut file_guard = None;
    let mut log_dir = None;
    let file_layer = if settings.file_logging_enabled {
        let dir = resolve_log_dir(&settings.log_dir, dirs::data_local_dir());
        let (non_blocking, guard) = tracing_appender::non_blocking(file_writer(settings, &dir)?);
        file_guard = Some(guard);
        log_dir = Some(dir);
        Some(formatted(settings).with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(level_filter(settings))
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!("Logging initialized (level {})", settings.level);
    if let Some(dir) = log_dir {
        tracing::debug!("Writing logs to {}", dir.display());
    }

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_rotation() {
        assert_eq!(parse_rotation("Hourly"), Rotation::HOURLY);
        assert_eq!(parse_rotation("never"), Rotation::NEVER);
        assert_eq!(parse_rotation("weekly"), Rotation::DAILY);
    }

    #[test]
    fn test_resolve_log_dir() {
        let base = PathBuf::from("/home/pilot/.local/share");
        assert_eq!(
            resolve_log_dir("logs", Some(base.clone())),
            base.join("HC05Radar").join("logs")
        );

        let absolute = std::env::temp_dir().join("radar-logs");
        let absolute_str = absolute.to_str().unwrap();
        assert_eq!(resolve_log_dir(absolute_str, Some(base)), absolute);
        assert_eq!(resolve_log_dir("logs", None), PathBuf::from("logs"));
    }

    #[test]
    fn test_file_writer_creates_prefixed_log() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let settings = LogSettings {
            rotation: "never".to_string(),
            ..Default::default()
        };

        let mut writer = file_writer(&settings, &log_dir).unwrap();
        writer.write_all(b"radar online\n").unwrap();
        writer.flush().unwrap();

        let names: Vec<String> = std::fs::read_dir(&log_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("hc05_radar"));
        assert!(names[0].ends_with(".log"));
    }
}
