//! Scene tree panel - lists scene entries with visibility and delete controls

use egui::Ui;
use shared::EntryKind;

use super::issue;
use crate::command::ViewportCommand;
use crate::loader::SceneLoader;

pub fn show(ui: &mut Ui, loader: &mut SceneLoader) {
    let entries = loader.module().map(|m| m.entries()).unwrap_or_default();
    let editable = loader
        .module()
        .is_some_and(|m| m.controller().is_some());

    ui.horizontal(|ui| {
        ui.heading("Scene");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("({})", entries.len()));
        });
    });
    ui.separator();

    if entries.is_empty() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.weak("No objects");
        });
        return;
    }

    let mut pending = Vec::new();
    egui::ScrollArea::vertical()
        .id_salt("scene_tree_scroll")
        .show(ui, |ui| {
            for entry in &entries {
                let label_color = if entry.visible {
                    egui::Color32::from_rgb(200, 200, 200)
                } else {
                    egui::Color32::from_rgb(100, 100, 100)
                };

                ui.horizontal(|ui| {
                    let eye = if entry.visible { "👁" } else { "—" };
                    if ui
                        .add_enabled(editable, egui::Button::new(eye).small())
                        .on_hover_text("Toggle visibility")
                        .clicked()
                    {
                        pending.push(ViewportCommand::ToggleVisibility {
                            id: entry.id.clone(),
                        });
                    }

                    ui.label(
                        egui::RichText::new(format!("{} {}", entry.kind.icon(), entry.name))
                            .color(label_color),
                    );

                    if entry.kind == EntryKind::Sketch {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui
                                .add_enabled(editable, egui::Button::new("🗑").small())
                                .on_hover_text("Delete")
                                .clicked()
                            {
                                pending.push(ViewportCommand::DeleteEntry {
                                    id: entry.id.clone(),
                                });
                            }
                        });
                    }
                });
            }
        });

    for cmd in pending {
        issue(loader, cmd);
    }
}
