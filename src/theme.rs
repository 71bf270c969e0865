use eframe::egui;
use egui::{Color32, CornerRadius, Margin, Stroke};

/// Club colour, used for the selected player's curve.
pub const ACCENT_COLOR: Color32 = Color32::from_rgb(211, 47, 47);
/// The all-players curve.
pub const AGGREGATE_COLOR: Color32 = Color32::from_rgb(60, 90, 160);
pub const REFERENCE_COLOR: Color32 = Color32::BLACK;

pub const CURVE_WIDTH: f32 = 2.0;
pub const MARGIN_PANEL: f32 = 15.0;

/// Palette for the n-th curve on a chart.
pub fn curve_color(index: usize) -> Color32 {
    match index {
        0 => AGGREGATE_COLOR,
        1 => ACCENT_COLOR,
        _ => Color32::from_rgb(120, 120, 120),
    }
}

pub fn apply_chart_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = Color32::from_rgb(245, 245, 240);
    visuals.window_fill = Color32::from_rgb(250, 250, 248);
    visuals.selection.bg_fill = ACCENT_COLOR.linear_multiply(0.4);
    visuals.window_corner_radius = CornerRadius::same(12);
    ctx.set_visuals(visuals);
}

pub fn chart_frame(ui: &egui::Ui) -> egui::Frame {
    egui::Frame::new()
        .fill(ui.visuals().panel_fill)
        .inner_margin(Margin::same(MARGIN_PANEL as i8))
        .stroke(Stroke::new(
            1.0,
            ui.visuals().widgets.noninteractive.bg_stroke.color,
        ))
}
