use cgmath::Matrix4;

pub mod render;
mod view_core;
mod view_data;
pub mod viewer;

/// cgmath builds OpenGL clip space, wgpu expects depth in `0..1`.
#[rustfmt::skip]
pub(crate) const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);
