// Library crate: exposes the headless viewport core for integration tests and the command interface.
// GUI-specific modules (app, ui, GL renderer) remain in the binary crate.

pub mod command;
pub mod error;
pub mod harness;
pub mod loader;
pub mod state;

/// Viewport core shared with the binary. The egui panel and GL renderer stay in the binary crate.
pub mod viewport {
    pub mod camera;
    pub mod controller;
    pub mod controls;
    pub mod listeners;
    pub mod mesh;
    pub mod projector;
    pub mod render_loop;
    pub mod views;
}

pub use error::ViewportError;
