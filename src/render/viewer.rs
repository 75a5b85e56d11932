use anyhow::Result;
use cgmath::{InnerSpace, Vector3};
use rand::{
    distributions::{Distribution, Uniform},
    rngs::SmallRng,
    SeedableRng,
};
use std::{cell::RefCell, collections::HashMap, rc::Rc};
use winit::dpi::PhysicalPosition;

use super::{
    render::Renderer,
    view_core::{scene_bounds, ViewCore},
    view_data::{Material, Vertex, ViewData},
};
use crate::config::{rgb, ViewerConfig};
use crate::frame::{frame_object, Framing};
use crate::import::ImportedMesh;
use crate::orbit::OrbitControls;

pub enum MousePressed {
    Left(Option<PhysicalPosition<f64>>),
    None,
}

pub struct Viewer {
    pub render: Rc<RefCell<Option<Renderer>>>,
    data: HashMap<u32, ViewData>,
    next_data_id: u32,
    view_core: ViewCore,
    controls: OrbitControls,
    framing: Framing,
    background: wgpu::Color,
    rng: SmallRng,

    active: bool,
    pub pressed_state: MousePressed,
}

impl Viewer {
    pub fn new(render: Rc<RefCell<Option<Renderer>>>, config: &ViewerConfig) -> Self {
        let [r, g, b] = rgb(config.background);
        Self {
            render,
            data: HashMap::new(),
            next_data_id: 0,
            view_core: ViewCore::new(config),
            controls: config.orbit_controls(),
            framing: config.framing,
            background: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
            rng: SmallRng::seed_from_u64(0x5eed),
            active: false,
            pressed_state: MousePressed::None,
        }
    }

    /// Inactive viewers skip rendering and camera updates.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.pressed_state = MousePressed::None;
            self.controls.stop();
        }
    }

    /// Adds a flat shaded triangle mesh. Meshes without a color get a random one.
    pub fn append_mesh(
        &mut self,
        points: &[f64],
        triangles: &[usize],
        color: Option<Vector3<f32>>,
    ) -> u32 {
        let point = |idx: usize| {
            let start = idx * 3;
            Vector3::<f32>::new(
                points[start] as f32,
                points[start + 1] as f32,
                points[start + 2] as f32,
            )
        };
        let vertices = Vec::from_iter(triangles.chunks_exact(3).flat_map(|f| {
            let verts = [point(f[0]), point(f[1]), point(f[2])];
            let vab = verts[1] - verts[0];
            let vac = verts[2] - verts[0];
            let cross = vab.cross(vac);
            let normal = if cross.magnitude2() > 0.0 {
                cross.normalize()
            } else {
                Vector3::unit_z()
            };
            verts.map(|p| Vertex {
                point: p.into(),
                normal: normal.into(),
            })
        }));

        let data_color = if let Some(color) = color {
            color
        } else {
            let between = Uniform::from(0.0..1.0);
            Vector3::new(
                between.sample(&mut self.rng),
                between.sample(&mut self.rng),
                between.sample(&mut self.rng),
            )
        };
        let data = ViewData::new(vertices, Material::new(data_color));
        let id = self.next_data_id;
        self.next_data_id += 1;
        self.data.insert(id, data);
        id
    }

    pub fn append_imported(&mut self, mesh: &ImportedMesh) -> Option<u32> {
        if mesh.triangle_count() == 0 {
            return None;
        }
        let color = mesh.color.map(Vector3::from);
        Some(self.append_mesh(&mesh.positions, &mesh.indices, color))
    }

    /// Drops every mesh together with its GPU buffers.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Moves the camera so the whole scene is visible.
    pub fn frame_all(&mut self) {
        let bbox = scene_bounds(&self.data);
        self.controls.stop();
        self.view_core.viewport = frame_object(&bbox, &self.view_core.viewport, &self.framing);
    }

    pub fn render(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.controls.update(&mut self.view_core.viewport);

        let render = self.render.borrow();
        let Some(render) = render.as_ref() else {
            return Ok(());
        };
        self.view_core.prepare(render, &mut self.data);

        let texture = render.surface.get_current_texture()?;
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = render
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &render.depth_texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            render_pass.set_viewport(0.0, 0.0, render.w() as f32, render.h() as f32, 0.0, 1.0);
            self.view_core.draw(&mut render_pass, &self.data);
        }
        render.queue.submit(std::iter::once(encoder.finish()));
        texture.present();
        Ok(())
    }

    pub fn mouse_move(&mut self, pos: PhysicalPosition<f64>) {
        if !self.active {
            return;
        }
        let MousePressed::Left(last) = &mut self.pressed_state else {
            return;
        };
        if let Some(last_pos) = last.replace(pos) {
            let height = self.render.borrow().as_ref().map_or(0, Renderer::h);
            self.controls
                .rotate_by_pixels(pos.x - last_pos.x, pos.y - last_pos.y, height);
        }
    }

    pub fn mouse_scroll(&mut self, delta_y: f64) {
        if self.active && delta_y != 0.0 {
            self.controls.dolly(delta_y);
        }
    }
}
