use super::render::Renderer;
use crate::frame::BoundingVolume;

use cgmath::Vector3;
use wgpu::{util::DeviceExt, BindGroup, BindGroupLayout, Buffer, RenderPass};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Vertex {
    pub(crate) point: [f32; 3],
    pub(crate) normal: [f32; 3],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub(crate) fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Material {
    pub(crate) color: [f32; 4],
}

impl Material {
    pub(crate) fn new(color: Vector3<f32>) -> Self {
        Self {
            color: [color.x, color.y, color.z, 1.0],
        }
    }
}

#[inline]
fn box_from_vertices(vertices: &[Vertex]) -> BoundingVolume {
    let mut bbox = BoundingVolume::default();
    for v in vertices {
        bbox.merge(&Vector3::from(v.point));
    }
    bbox
}

struct MeshResources {
    vertex_buffer: Buffer,
    // Referenced by the bind group, kept alive with it.
    _material_buffer: Buffer,
    material_bind_group: BindGroup,
}

/// One mesh of the scene with its GPU buffers.
pub(crate) struct ViewData {
    vertices: Vec<Vertex>,
    material: Material,
    pub(crate) bbox: BoundingVolume,
    resources: Option<MeshResources>,
}

impl ViewData {
    pub(crate) fn new(vertices: Vec<Vertex>, material: Material) -> Self {
        let bbox = box_from_vertices(&vertices);
        Self {
            vertices,
            material,
            bbox,
            resources: None,
        }
    }

    #[inline]
    pub(crate) fn has_resources(&self) -> bool {
        self.resources.is_some()
    }

    pub(crate) fn init_resources(&mut self, render: &Renderer, material_layout: &BindGroupLayout) {
        let vertex_buffer = render
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("vertex_buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let material_buffer = render
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("material_buffer"),
                contents: bytemuck::cast_slice(&[self.material]),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let material_bind_group = render.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bind_group"),
            layout: material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: material_buffer.as_entire_binding(),
            }],
        });

        self.resources = Some(MeshResources {
            vertex_buffer,
            _material_buffer: material_buffer,
            material_bind_group,
        });
    }

    pub(crate) fn render<'a>(&'a self, render_pass: &mut RenderPass<'a>) {
        if let Some(resources) = self.resources.as_ref() {
            render_pass.set_bind_group(1, &resources.material_bind_group, &[]);
            render_pass.set_vertex_buffer(0, resources.vertex_buffer.slice(..));
            render_pass.draw(0..self.vertices.len() as u32, 0..1);
        }
    }
}
