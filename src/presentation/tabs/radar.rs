use crate::domain::models::ConnectionStatus;
use crate::infrastructure::serial::protocol::DriveCommand;
use crate::presentation::app::RadarApp;
use crate::presentation::components::Components;
use crate::presentation::{drive_pad, radar_view};
use eframe::egui;

/// Returns the drive direction held this frame
pub fn render(app: &mut RadarApp, ui: &mut egui::Ui) -> Option<DriveCommand> {
    let mut pressed = None;

    ui.horizontal_top(|ui| {
        let size = ui
            .available_height()
            .min(ui.available_width() - 300.0)
            .max(200.0);
        radar_view::show(ui, app.placement.as_ref(), app.is_dark_mode, size);

        ui.vertical(|ui| {
            ui.set_max_width(280.0);
            ui_connection_panel(app, ui);
            ui_reading_panel(app, ui);
            pressed = ui_drive_panel(app, ui);
            ui_status_panel(app, ui);
        });
    });

    pressed
}

fn ui_connection_panel(app: &mut RadarApp, ui: &mut egui::Ui) {
    Components::panel(ui, "Connection", |ui| {
        Components::connection_banner(ui, app.connection_status);

        let port = app
            .settings
            .lock()
            .ok()
            .and_then(|s| {
                let s = s.get();
                s.port_name.clone().or_else(|| s.last_connected_port.clone())
            });
        if let Some(port) = port {
            ui.label(format!("Port: {}", port));
        }

        ui.horizontal(|ui| match app.connection_status {
            ConnectionStatus::Connected => {
                if ui.button("Disconnect").clicked() {
                    app.disconnect();
                }
            }
            ConnectionStatus::Connecting => {
                ui.spinner();
            }
            ConnectionStatus::Disconnected | ConnectionStatus::Error => {
                if ui.button("Connect").clicked() {
                    app.connect();
                }
            }
        });
    });
}

fn ui_reading_panel(app: &RadarApp, ui: &mut egui::Ui) {
    Components::panel(ui, "Target", |ui| {
        egui::Grid::new("reading_grid")
            .spacing([30.0, 6.0])
            .show(ui, |ui| match &app.latest_reading {
                Some(reading) => {
                    ui.label("Distance:");
                    ui.label(format!("{:.1}", reading.distance));
                    ui.end_row();

                    ui.label("Bearing:");
                    ui.label(format!("{:.1}°", reading.bearing));
                    ui.end_row();

                    if let Some(placement) = &app.placement {
                        ui.label("Scope offset:");
                        ui.label(format!(
                            "{:.0} / {:.0}°",
                            placement.top_margin, placement.rotation_deg
                        ));
                        ui.end_row();
                    }

                    ui.label("Frames:");
                    ui.label(app.readings_received.to_string());
                    ui.end_row();
                }
                None => {
                    ui.label("No target");
                    ui.end_row();
                }
            });
    });
}

fn ui_drive_panel(app: &RadarApp, ui: &mut egui::Ui) -> Option<DriveCommand> {
    Components::panel(ui, "Drive", |ui| {
        let enabled = app.connection_status == ConnectionStatus::Connected;
        let pressed = drive_pad::show(ui, &app.drive_pad, enabled);
        if let Some(command) = app.last_sent {
            ui.label(
                egui::RichText::new(format!("Last sent: {}", command))
                    .small()
                    .weak(),
            );
        }
        pressed
    })
}

fn ui_status_panel(app: &RadarApp, ui: &mut egui::Ui) {
    if let Some(msg) = &app.status_message {
        ui.label(
            egui::RichText::new(&msg.message)
                .color(Components::severity_color(msg.severity))
                .strong(),
        );
    }
}
