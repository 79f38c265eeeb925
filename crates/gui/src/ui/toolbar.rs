//! Navigation bar: drawing mode and view presets

use egui::Ui;
use shared::ViewName;

use super::issue;
use crate::command::ViewportCommand;
use crate::loader::SceneLoader;

pub fn show(ui: &mut Ui, loader: &mut SceneLoader) {
    let interactive = loader
        .module()
        .is_some_and(|m| m.controller().is_some());
    let drawing = loader
        .module()
        .and_then(|m| m.controller())
        .is_some_and(|c| c.is_drawing());

    ui.horizontal(|ui| {
        let draw_button = egui::Button::new("✏ Draw Line").selected(drawing);
        if ui
            .add_enabled(interactive, draw_button)
            .on_hover_text("Toggle Drawing Mode")
            .clicked()
        {
            issue(loader, ViewportCommand::ToggleDrawing);
        }

        ui.separator();

        if ui
            .add_enabled(interactive, egui::Button::new("⬇ Top"))
            .on_hover_text("Top View")
            .clicked()
        {
            set_view(loader, ViewName::Top);
        }
        if ui
            .add_enabled(interactive, egui::Button::new("◆ 3D"))
            .on_hover_text("3D View")
            .clicked()
        {
            set_view(loader, ViewName::Iso3d);
        }
    });
}

fn set_view(loader: &mut SceneLoader, view: ViewName) {
    issue(
        loader,
        ViewportCommand::SetView {
            name: view.as_str().to_string(),
        },
    );
}
