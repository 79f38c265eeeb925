//! Error types for the viewport core

use thiserror::Error;

/// Viewport error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewportError {
    #[error("viewport initialization failed: {0}")]
    Initialization(String),
    #[error("pointer ray is parallel to the reference plane")]
    DegenerateProjection,
    #[error("failed to load scene module: {0}")]
    ModuleLoad(String),
    #[error("unknown view preset: {0}")]
    UnknownPreset(String),
    #[error("unknown scene entry: {0}")]
    UnknownEntry(String),
    #[error("scene entry cannot be deleted: {0}")]
    ProtectedEntry(String),
}
