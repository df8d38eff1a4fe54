use eframe::egui;

/// Scope colors, phosphor green on dark or ink on paper
pub struct RadarPalette {
    pub bg: egui::Color32,
    pub fg: egui::Color32,
    pub stroke: egui::Color32,
    pub scope_bg: egui::Color32,
    pub grid: egui::Color32,
    pub sweep: egui::Color32,
    pub blip: egui::Color32,
}

impl RadarPalette {
    pub fn new(is_dark: bool) -> Self {
        if is_dark {
            Self {
                bg: egui::Color32::from_rgb(12, 18, 14),
                fg: egui::Color32::from_rgb(190, 255, 200),
                stroke: egui::Color32::from_rgb(60, 140, 80),
                scope_bg: egui::Color32::from_rgb(4, 24, 10),
                grid: egui::Color32::from_rgb(30, 110, 50),
                sweep: egui::Color32::from_rgb(80, 255, 120),
                blip: egui::Color32::from_rgb(255, 80, 80),
            }
        } else {
            Self {
                bg: egui::Color32::from_rgb(240, 244, 240),
                fg: egui::Color32::from_rgb(20, 30, 20),
                stroke: egui::Color32::from_rgb(40, 90, 50),
                scope_bg: egui::Color32::from_rgb(10, 40, 20),
                grid: egui::Color32::from_rgb(40, 130, 60),
                sweep: egui::Color32::from_rgb(90, 240, 120),
                blip: egui::Color32::from_rgb(255, 60, 60),
            }
        }
    }
}

pub fn configure_radar_style(ctx: &egui::Context, is_dark: bool) {
    let mut style = (*ctx.style()).clone();
    let palette = RadarPalette::new(is_dark);

    style
        .text_styles
        .iter_mut()
        .for_each(|(text_style, font_id)| {
            font_id.size = match text_style {
                egui::TextStyle::Heading => 24.0,
                egui::TextStyle::Body => 15.0,
                egui::TextStyle::Button => 18.0,
                _ => font_id.size,
            };
        });

    style.spacing.item_spacing = egui::vec2(10.0, 10.0);
    style.spacing.button_padding = egui::vec2(14.0, 10.0);

    let rounding = egui::Rounding::same(6.0);

    style.visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.5, palette.stroke);
    style.visuals.widgets.noninteractive.rounding = rounding;
    style.visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, palette.fg);
    style.visuals.widgets.noninteractive.bg_fill = palette.bg;

    style.visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.5, palette.stroke);
    style.visuals.widgets.inactive.rounding = rounding;
    style.visuals.widgets.inactive.bg_fill = if is_dark {
        egui::Color32::from_rgb(20, 40, 26)
    } else {
        egui::Color32::WHITE
    };
    style.visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, palette.fg);

    style.visuals.widgets.hovered.bg_stroke = egui::Stroke::new(2.0, palette.sweep);
    style.visuals.widgets.hovered.rounding = rounding;
    style.visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, palette.fg);

    style.visuals.widgets.active.bg_stroke = egui::Stroke::new(2.5, palette.sweep);
    style.visuals.widgets.active.rounding = rounding;
    style.visuals.widgets.active.bg_fill = palette.grid;
    style.visuals.widgets.active.fg_stroke = egui::Stroke::new(1.0, egui::Color32::BLACK);

    style.visuals.selection.stroke = egui::Stroke::new(1.0, palette.stroke);
    style.visuals.selection.bg_fill = palette.grid;

    style.visuals.window_fill = palette.bg;
    style.visuals.panel_fill = palette.bg;
    style.visuals.override_text_color = Some(palette.fg);

    ctx.set_style(style);
}
