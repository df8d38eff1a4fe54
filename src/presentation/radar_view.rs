use crate::domain::radar::RadarPlacement;
use crate::presentation::theme::RadarPalette;
use eframe::egui;

const SWEEP_DEG_PER_SEC: f64 = 90.0;
const SWEEP_TRAIL: usize = 14;
const RINGS: usize = 4;
const BLIP_RADIUS: f32 = 7.0;

/// Unit vector for an angle measured clockwise from the top of the scope
fn direction(angle_rad: f32) -> egui::Vec2 {
    egui::vec2(angle_rad.sin(), -angle_rad.cos())
}

/// Screen position of a placement on a scope of the given center and radius
pub fn scope_point(center: egui::Pos2, radius: f32, placement: &RadarPlacement) -> egui::Pos2 {
    center + direction(placement.rotation_rad()) * radius * placement.range_fraction
}

pub fn show(
    ui: &mut egui::Ui,
    placement: Option<&RadarPlacement>,
    is_dark: bool,
    size: f32,
) -> egui::Response {
    let palette = RadarPalette::new(is_dark);
    let (response, painter) = ui.allocate_painter(egui::Vec2::splat(size), egui::Sense::hover());
    let center = response.rect.center();
    let radius = size / 2.0 - 4.0;
    let time = ui.input(|i| i.time);

    painter.circle_filled(center, radius, palette.scope_bg);
    for ring in 1..=RINGS {
        let r = radius * ring as f32 / RINGS as f32;
        painter.circle_stroke(center, r, egui::Stroke::new(1.0, palette.grid));
    }
    for spoke in 0..4 {
        let dir = direction((spoke as f32 * 45.0).to_radians());
        painter.line_segment(
            [center - dir * radius, center + dir * radius],
            egui::Stroke::new(0.5, palette.grid),
        );
    }

    let sweep_deg = (time * SWEEP_DEG_PER_SEC).rem_euclid(360.0) as f32;
    for step in (0..SWEEP_TRAIL).rev() {
        let angle = (sweep_deg - step as f32 * 2.0).to_radians();
        let fade = 1.0 - step as f32 / SWEEP_TRAIL as f32;
        painter.line_segment(
            [center, center + direction(angle) * radius],
            egui::Stroke::new(2.0, palette.sweep.gamma_multiply(fade * fade)),
        );
    }

    if let Some(placement) = placement {
        let pos = scope_point(center, radius, placement);
        let pulse = (time.fract()) as f32;
        painter.circle_stroke(
            pos,
            BLIP_RADIUS + pulse * 14.0,
            egui::Stroke::new(2.0, palette.blip.gamma_multiply(1.0 - pulse)),
        );
        painter.circle_filled(pos, BLIP_RADIUS, palette.blip);
    }

    painter.circle_stroke(center, radius, egui::Stroke::new(2.0, palette.stroke));
    response
}
