mod domain;
mod infrastructure;
mod presentation;

use domain::settings::SettingsService;
use eframe::egui;
use std::sync::{Arc, Mutex};

fn main() -> anyhow::Result<()> {
    let settings_service = SettingsService::new()?;

    let _logging_guard = match infrastructure::logging::init_logger(&settings_service.get().log_settings)
    {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("Starting HC-05 Radar");
    tracing::info!("Settings: {}", settings_service.path().display());

    let settings = Arc::new(Mutex::new(settings_service));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 620.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("HC-05 Radar"),
        ..Default::default()
    };

    eframe::run_native(
        "HC-05 Radar",
        options,
        Box::new(move |cc| Ok(Box::new(presentation::app::RadarApp::new(cc, settings)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}
