use crate::domain::models::{MessageSeverity, StatusMessage};
use crate::presentation::app::RadarApp;
use crate::presentation::components::Components;
use eframe::egui;

const BAUD_RATES: [u32; 6] = [9600, 19200, 38400, 57600, 115200, 230400];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn render(app: &mut RadarApp, ui: &mut egui::Ui) {
    Components::heading(ui, "Settings");
    ui.add_space(10.0);

    let mut save_clicked = false;
    let is_dark_mode = app.is_dark_mode;

    let path = app
        .settings
        .lock()
        .map(|s| s.path().display().to_string())
        .unwrap_or_default();

    {
        let settings_mut = &mut app.settings_draft;

        Components::panel(ui, "Device", |ui| {
            egui::Grid::new("device_grid")
                .spacing([10.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Device name:");
                    ui.text_edit_singleline(&mut settings_mut.device_name);
                    ui.end_row();

                    ui.label("Port override:");
                    let mut port = settings_mut.port_name.clone().unwrap_or_default();
                    if ui
                        .add(egui::TextEdit::singleline(&mut port).hint_text("discover by name"))
                        .changed()
                    {
                        let port = port.trim();
                        settings_mut.port_name = (!port.is_empty()).then(|| port.to_string());
                    }
                    ui.end_row();

                    ui.label("Baud rate:");
                    egui::ComboBox::from_id_salt("baud_rate")
                        .selected_text(settings_mut.baud_rate.to_string())
                        .show_ui(ui, |ui| {
                            for rate in BAUD_RATES {
                                ui.selectable_value(
                                    &mut settings_mut.baud_rate,
                                    rate,
                                    rate.to_string(),
                                );
                            }
                        });
                    ui.end_row();

                    ui.label("Service UUID:");
                    ui.text_edit_singleline(&mut settings_mut.service_uuid);
                    ui.end_row();
                });
            ui.label(
                egui::RichText::new("Changes to the device apply on the next connect.")
                    .small()
                    .weak(),
            );
        });

        ui.add_space(10.0);

        Components::panel(ui, "Telemetry & Controls", |ui| {
            egui::Grid::new("telemetry_grid")
                .spacing([10.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Read interval (ms):");
                    ui.add(egui::DragValue::new(&mut settings_mut.read_interval_ms).range(0..=5000));
                    ui.end_row();

                    ui.label("Read buffer (bytes):");
                    ui.add(
                        egui::DragValue::new(&mut settings_mut.read_buffer_size).range(16..=8192),
                    );
                    ui.end_row();

                    ui.label("Long press (ms):");
                    ui.add(egui::DragValue::new(&mut settings_mut.long_press_ms).range(0..=2000));
                    ui.end_row();

                    ui.label("Radar baseline:");
                    ui.add(
                        egui::DragValue::new(&mut settings_mut.radar_baseline)
                            .range(10.0..=5000.0)
                            .speed(5.0),
                    );
                    ui.end_row();
                });
        });

        ui.add_space(10.0);

        Components::panel(ui, "Logging", |ui| {
            ui.horizontal(|ui| {
                ui.label("Level:");
                egui::ComboBox::from_id_salt("log_level")
                    .selected_text(settings_mut.log_settings.level.clone())
                    .show_ui(ui, |ui| {
                        for level in LOG_LEVELS {
                            ui.selectable_value(
                                &mut settings_mut.log_settings.level,
                                level.to_string(),
                                level,
                            );
                        }
                    });
            });
            ui.checkbox(
                &mut settings_mut.log_settings.file_logging_enabled,
                "Write log files",
            );
            ui.checkbox(
                &mut settings_mut.log_settings.console_logging_enabled,
                "Log to console",
            );
            ui.label(
                egui::RichText::new("Logging changes apply after restart.")
                    .small()
                    .weak(),
            );
        });

        ui.add_space(10.0);

        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                save_clicked = true;
            }
            if ui.button("Reset to defaults").clicked() {
                *settings_mut = Default::default();
                settings_mut.dark_mode = is_dark_mode;
            }
        });
        ui.label(egui::RichText::new(path).small().weak());
    }

    match save_clicked.then(|| app.save_settings()) {
        Some(Ok(())) => {
            app.status_message = Some(StatusMessage::new("Settings saved", MessageSeverity::Success));
        }
        Some(Err(e)) => {
            tracing::warn!("Failed to save settings: {:#}", e);
            app.status_message = Some(StatusMessage::new(
                format!("Settings not saved: {:#}", e),
                MessageSeverity::Error,
            ));
        }
        None => {}
    }

    if let Some(msg) = &app.status_message {
        ui.label(
            egui::RichText::new(&msg.message)
                .color(Components::severity_color(msg.severity))
                .strong(),
        );
    }
}
