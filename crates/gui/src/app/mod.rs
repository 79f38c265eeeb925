//! Main application module

mod styles;

use eframe::egui;

use crate::loader::SceneLoader;
use crate::state::settings::ViewportSettings;
use crate::state::PanelVisibility;
use crate::ui::{scene_tree, status_bar, toolbar};
use crate::viewport::ViewportPanel;
use sketch_viewport_lib::ViewportError;

/// Main application
pub struct SketchApp {
    settings: ViewportSettings,
    loader: SceneLoader,
    viewport: ViewportPanel,
    panels: PanelVisibility,
}

impl SketchApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: ViewportSettings,
        mut loader: SceneLoader,
    ) -> Self {
        styles::configure_styles(&cc.egui_ctx);

        let mut viewport = ViewportPanel::new();

        // The viewport needs a GL context; without one nothing is created
        match cc.gl.as_ref() {
            Some(gl) => {
                if let Err(e) = viewport.init_gl(gl) {
                    loader.abort(ViewportError::Initialization(e));
                }
            }
            None => loader.abort(ViewportError::Initialization(
                "no OpenGL context available".into(),
            )),
        }

        Self {
            settings,
            loader,
            viewport,
            panels: PanelVisibility::default(),
        }
    }
}

impl eframe::App for SketchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Navigation bar ───────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                toolbar::show(ui, &mut self.loader);
            });

        // ── Status bar ───────────────────────────────────────
        if self.panels.status_bar {
            egui::TopBottomPanel::bottom("status_bar")
                .exact_height(22.0)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style())
                        .inner_margin(egui::Margin::symmetric(8, 2)),
                )
                .show(ctx, |ui| {
                    status_bar::show(ui, &self.loader);
                });
        }

        // ── Left panel: Scene tree ───────────────────────────
        if self.panels.scene_tree {
            egui::SidePanel::left("scene_tree")
                .default_width(210.0)
                .width_range(140.0..=400.0)
                .resizable(true)
                .frame(
                    egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(6)),
                )
                .show(ctx, |ui| {
                    scene_tree::show(ui, &mut self.loader);
                });
        }

        // ── Central panel: viewport ──────────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.loader, &self.settings);
            });
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        self.loader.destroy();
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
        self.settings.save();
    }
}
