//! Application style configuration

use eframe::egui;

/// Configure application styles
pub fn configure_styles(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::dark();

    style.visuals.window_corner_radius = egui::CornerRadius::same(6);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(3);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(3);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(3);

    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 3.0);

    // Panels slightly darker than the 0x222222 canvas
    style.visuals.panel_fill = egui::Color32::from_rgb(28, 28, 30);

    // Selected (active drawing mode) button
    style.visuals.selection.bg_fill = egui::Color32::from_rgb(0, 110, 120);

    ctx.set_style(style);
}
