//! Viewport panel: feeds egui input to the active scene module and paints
//! its frames with OpenGL

mod gl_renderer;
use sketch_viewport_lib::viewport::{controller, listeners, mesh, render_loop};

use std::sync::{Arc, Mutex};

use egui::{Event, Key, PointerButton, Rect, Ui};
use glam::Vec2;

use crate::loader::SceneLoader;
use crate::state::settings::ViewportSettings;
use controller::Surface;
use gl_renderer::GlRenderer;
use listeners::InputEvent;
use render_loop::{FrameData, RenderTarget};

/// Frame handed from the render loop to the paint callback
#[derive(Default)]
struct FrameSlot {
    frame: Option<FrameData>,
    size: [f32; 2],
    released: bool,
}

/// Render target backed by the egui glow painter
struct GlTarget {
    slot: Arc<Mutex<FrameSlot>>,
}

impl RenderTarget for GlTarget {
    fn resize(&mut self, width: f32, height: f32) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.size = [width, height];
        }
    }

    fn render(&mut self, frame: FrameData) {
        if let Ok(mut slot) = self.slot.lock() {
            if !slot.released {
                slot.frame = Some(frame);
            }
        }
    }

    fn release(&mut self) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.released = true;
            slot.frame = None;
        }
    }
}

/// Central viewport panel
pub struct ViewportPanel {
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    slot: Arc<Mutex<FrameSlot>>,
    last_rect: Option<Rect>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            gl_renderer: None,
            slot: Arc::new(Mutex::new(FrameSlot::default())),
            last_rect: None,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) -> Result<(), String> {
        let renderer = GlRenderer::new(gl)?;
        self.gl_renderer = Some(Arc::new(Mutex::new(renderer)));
        Ok(())
    }

    pub fn has_gl(&self) -> bool {
        self.gl_renderer.is_some()
    }

    /// Free GPU resources. Safe to call more than once.
    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = &self.gl_renderer {
            if let Ok(mut r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    pub fn show(&mut self, ui: &mut Ui, loader: &mut SceneLoader, settings: &ViewportSettings) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        // ── Module init on the first usable rect ────────────
        if usable_rect(rect) && loader.module().is_none() && !loader.is_failed() && self.has_gl() {
            let target = GlTarget {
                slot: self.slot.clone(),
            };
            // Failures are recorded in the loader status
            let _ = loader.init(Surface::new(rect, target), settings.clone());
            self.last_rect = Some(rect);
        }

        let Some(module) = loader.module_mut() else {
            return;
        };

        // ── Resize before the frame renders ─────────────────
        if self.last_rect != Some(rect) {
            module.handle_event(InputEvent::Resize { rect });
            self.last_rect = Some(rect);
        }

        // ── Pointer and keyboard events ─────────────────────
        for event in collect_input(ui, rect) {
            module.handle_event(event);
        }

        // ── Camera controls ─────────────────────────────────
        if let Some(controller) = module.controller_mut() {
            let delta = response.drag_delta();
            let delta = Vec2::new(delta.x, delta.y);
            if response.dragged_by(PointerButton::Primary) {
                controller.orbit(delta);
            } else if response.dragged_by(PointerButton::Secondary)
                || response.dragged_by(PointerButton::Middle)
            {
                controller.pan(delta);
            }
            if response.hovered() {
                let scroll = ui.input(|i| i.smooth_scroll_delta.y);
                if scroll.abs() > 0.1 {
                    controller.zoom(scroll);
                }
            }
        }

        // ── Frame ───────────────────────────────────────────
        if module.frame() {
            ui.ctx().request_repaint();
        }

        if ui.is_rect_visible(rect) {
            self.paint(ui, rect);
        }
    }

    fn paint(&self, ui: &mut Ui, rect: Rect) {
        let Some(gl_renderer) = &self.gl_renderer else {
            return;
        };
        let renderer = gl_renderer.clone();
        let slot = self.slot.clone();

        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(egui_glow::CallbackFn::new(move |info, painter| {
                let frame = match slot.lock() {
                    Ok(s) if !s.released && s.size[0] > 0.0 && s.size[1] > 0.0 => s.frame.clone(),
                    _ => None,
                };
                let Some(frame) = frame else {
                    return;
                };
                let clip = info.clip_rect_in_pixels();
                let viewport = [
                    clip.left_px as f32,
                    clip.from_bottom_px as f32,
                    clip.width_px as f32,
                    clip.height_px as f32,
                ];
                if let Ok(mut r) = renderer.lock() {
                    r.paint(painter.gl(), &frame, viewport);
                }
            })),
        };
        ui.painter().add(callback);
    }
}

/// A layout pass can hand out an empty rect before the panel has its size
fn usable_rect(rect: Rect) -> bool {
    rect.is_finite() && rect.width() > 0.0 && rect.height() > 0.0
}

/// Translate this frame's egui events into viewport input
fn collect_input(ui: &Ui, rect: Rect) -> Vec<InputEvent> {
    ui.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } if rect.contains(*pos) => Some(if *pressed {
                    InputEvent::PointerDown {
                        pos: *pos,
                        button: *button,
                    }
                } else {
                    InputEvent::PointerUp {
                        pos: *pos,
                        button: *button,
                    }
                }),
                Event::PointerMoved(pos) if rect.contains(*pos) => {
                    Some(InputEvent::PointerMove { pos: *pos })
                }
                Event::Key {
                    key: Key::Escape,
                    pressed: true,
                    ..
                } => Some(InputEvent::KeyDown { key: Key::Escape }),
                _ => None,
            })
            .collect()
    })
}
