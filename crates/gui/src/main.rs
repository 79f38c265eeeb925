mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::loader`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use sketch_viewport_lib::command;
pub use sketch_viewport_lib::loader;
pub use sketch_viewport_lib::state;

use app::SketchApp;
use loader::{HttpModuleSource, SceneLoader};
use sketch_viewport_lib::ViewportError;
use state::settings::ViewportSettings;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sketch_viewport=info".into()),
        )
        .init();

    let settings = ViewportSettings::load();
    let loader = select_module(&settings);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Sketch Viewport")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "sketch-viewport",
        native_options,
        Box::new(move |cc| Ok(Box::new(SketchApp::new(cc, settings, loader)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

/// Probe the configured bundle URL once, before the window opens
fn select_module(settings: &ViewportSettings) -> SceneLoader {
    let mut loader = SceneLoader::new();
    let source = settings.module.url.as_deref().map(HttpModuleSource::new);

    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt.block_on(loader.select(source.as_ref())),
        Err(e) => loader.abort(ViewportError::ModuleLoad(format!("async runtime: {e}"))),
    }
    tracing::info!("Scene loader: {}", loader.status());
    loader
}
