//! Per-frame loop with explicit cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::state::scene::LineBatch;

/// Cancellation flag shared between the loop and whoever stops it
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Preview line drawn on top of the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: [f32; 4],
}

/// Everything a render target needs to draw one frame
#[derive(Debug, Clone)]
pub struct FrameData {
    pub view_projection: Mat4,
    pub clear_color: [f32; 3],
    pub batches: Vec<LineBatch>,
    pub preview: Option<PreviewLine>,
}

/// Drawable surface backing a viewport
pub trait RenderTarget {
    /// Match the canvas client size in pixels
    fn resize(&mut self, width: f32, height: f32);
    fn render(&mut self, frame: FrameData);
    /// Free GPU resources; called once on teardown
    fn release(&mut self);
}

/// Continuous redraw loop that runs until its token is cancelled
#[derive(Debug, Default)]
pub struct RenderLoop {
    token: CancelToken,
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Frames rendered so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Run one frame unless cancelled. Returns whether the frame ran.
    pub fn tick(&mut self, frame: impl FnOnce()) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        frame();
        self.frames += 1;
        true
    }

    /// Drive frames back to back until the token is cancelled.
    /// Returns the number of frames run.
    pub fn run_until_cancelled(&mut self, mut frame: impl FnMut(&CancelToken)) -> u64 {
        let start = self.frames;
        let token = self.token.clone();
        while self.tick(|| frame(&token)) {}
        self.frames - start
    }
}
