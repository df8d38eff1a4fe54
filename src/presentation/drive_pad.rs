use crate::domain::drive::DrivePad;
use crate::infrastructure::serial::protocol::DriveCommand;
use eframe::egui;

const BUTTON_SIZE: [f32; 2] = [64.0, 56.0];

fn drive_button(
    ui: &mut egui::Ui,
    label: &str,
    command: DriveCommand,
    pad: &DrivePad,
    held: &mut Option<DriveCommand>,
) {
    let driving = pad.is_driving() && pad.held() == Some(command);
    let text = egui::RichText::new(label).size(22.0).strong();
    let button = if driving {
        egui::Button::new(text).fill(egui::Color32::from_rgb(0, 190, 70))
    } else {
        egui::Button::new(text)
    };

    let response = ui.add_sized(BUTTON_SIZE, button);
    if response.is_pointer_button_down_on() {
        *held = Some(command);
    }
}

/// Direction held via the arrow keys, if any
fn keyboard_direction(ctx: &egui::Context) -> Option<DriveCommand> {
    ctx.input(|i| {
        if i.key_down(egui::Key::ArrowUp) {
            Some(DriveCommand::Forward)
        } else if i.key_down(egui::Key::ArrowDown) {
            Some(DriveCommand::Back)
        } else if i.key_down(egui::Key::ArrowLeft) {
            Some(DriveCommand::Left)
        } else if i.key_down(egui::Key::ArrowRight) {
            Some(DriveCommand::Right)
        } else {
            None
        }
    })
}

/// Draw the pad and report which direction is held this frame
pub fn show(ui: &mut egui::Ui, pad: &DrivePad, enabled: bool) -> Option<DriveCommand> {
    let mut held = None;

    ui.add_enabled_ui(enabled, |ui| {
        egui::Grid::new("drive_pad")
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                ui.label("");
                drive_button(ui, "▲", DriveCommand::Forward, pad, &mut held);
                ui.label("");
                ui.end_row();

                drive_button(ui, "◀", DriveCommand::Left, pad, &mut held);
                ui.add_sized(
                    BUTTON_SIZE,
                    egui::Label::new(match pad.held() {
                        Some(command) if pad.is_driving() => format!("{}", command),
                        _ => "·".to_string(),
                    }),
                );
                drive_button(ui, "▶", DriveCommand::Right, pad, &mut held);
                ui.end_row();

                ui.label("");
                drive_button(ui, "▼", DriveCommand::Back, pad, &mut held);
                ui.label("");
                ui.end_row();
            });
    });

    if !enabled {
        return None;
    }
    held.or_else(|| keyboard_direction(ui.ctx()))
}
