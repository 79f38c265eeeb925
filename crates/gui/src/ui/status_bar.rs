use egui::Ui;

use crate::loader::SceneLoader;
use crate::state::{ActivePhase, DrawingState};

pub fn show(ui: &mut Ui, loader: &SceneLoader) {
    ui.horizontal(|ui| {
        let status = loader.status().to_string();
        if loader.is_failed() {
            ui.colored_label(egui::Color32::from_rgb(255, 110, 110), status);
        } else {
            ui.weak(status);
        }

        let Some(viewport) = loader.module().and_then(|m| m.controller()) else {
            return;
        };

        ui.separator();
        let session = viewport.session();
        ui.weak(format!(
            "Vertices: {}  Segments: {}",
            session.vertex_count(),
            session.segment_count()
        ));

        ui.separator();
        match viewport.drawing_state() {
            DrawingState::Idle => {
                ui.weak("Ready");
            }
            DrawingState::Active(phase) => {
                let hint = match phase {
                    ActivePhase::NoVertex => "click to place the first point",
                    ActivePhase::HasVertex => "click to add a point",
                };
                ui.colored_label(egui::Color32::YELLOW, format!("Drawing: {hint}"));
                ui.separator();
                ui.weak("Esc to finish");
            }
        }
    });
}
