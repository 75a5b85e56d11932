//! Browser preview for CAD files.
//!
//! STEP files go through an external importer into a wgpu scene, SLDPRT files
//! get a stub preview and a mock conversion to STEP.

pub mod config;
pub mod convert;
pub mod error;
pub mod fallback;
pub mod file_kind;
pub mod frame;
pub mod import;
pub mod mode;
pub mod orbit;
pub mod session;
pub mod task;

#[cfg(target_arch = "wasm32")]
pub mod importer;
#[cfg(target_arch = "wasm32")]
pub mod render;
#[cfg(target_arch = "wasm32")]
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub use ui::App;

/// Id of the canvas the scene renders into.
pub const SCENE_CANVAS_ID: &str = "scene-canvas";
