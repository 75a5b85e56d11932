use std::collections::HashMap;

use cgmath::{Matrix4, Vector3};
use wgpu::{util::DeviceExt, BindGroup, BindGroupLayout, Buffer, CompareFunction, RenderPipeline};

use super::{
    render::{Renderer, DEPTH_FORMAT},
    view_data::{Vertex, ViewData},
    OPENGL_TO_WGPU_MATRIX,
};
use crate::config::ViewerConfig;
use crate::frame::{BoundingVolume, Viewport};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    key_dir: [f32; 4],
    key_color: [f32; 4],
    fill_dir: [f32; 4],
    fill_color: [f32; 4],
}

struct ViewBuffer {
    camera_bind_group: BindGroup,
    camera_buffer: Buffer,
}

struct Pipeline {
    material_bind_group_layout: BindGroupLayout,
    pipeline: RenderPipeline,
}

/// Camera, lights and the shared render pipeline.
pub(crate) struct ViewCore {
    pub(crate) viewport: Viewport,
    camera_near: f32,
    camera_up: Vector3<f32>,

    ambient: f32,
    key_dir: Vector3<f32>,
    key_intensity: f32,
    fill_dir: Vector3<f32>,
    fill_intensity: f32,

    view_buffer: Option<ViewBuffer>,
    pipeline: Option<Pipeline>,
}

impl ViewCore {
    pub(crate) fn new(config: &ViewerConfig) -> Self {
        Self {
            viewport: config.initial_viewport(),
            camera_near: config.near,
            camera_up: Vector3::new(0.0, 1.0, 0.0),

            ambient: config.ambient_intensity,
            key_dir: config.key_light.position,
            key_intensity: config.key_light.intensity,
            fill_dir: config.fill_light.position,
            fill_intensity: config.fill_light.intensity,

            view_buffer: None,
            pipeline: None,
        }
    }

    fn init_view_buffer(&self, render: &Renderer) -> (BindGroupLayout, ViewBuffer) {
        let camera_bind_group_layout =
            render
                .device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("camera_bind_group_layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let camera_buffer = render
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("camera_buffer"),
                contents: bytemuck::cast_slice(&[self.uniform(render)]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let camera_bind_group = render.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        (
            camera_bind_group_layout,
            ViewBuffer {
                camera_bind_group,
                camera_buffer,
            },
        )
    }

    fn init_pipeline(&self, render: &Renderer, camera_layout: &BindGroupLayout) -> Pipeline {
        let material_bind_group_layout =
            render
                .device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("material_bind_group_layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

        let shader = render
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
            });

        let render_pipeline_layout =
            render
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("render_pipeline_layout"),
                    bind_group_layouts: &[camera_layout, &material_bind_group_layout],
                    push_constant_ranges: &[],
                });

        let pipeline = render
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("render_pipeline"),
                layout: Some(&render_pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[Vertex::desc()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: render.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                // Imported shells do not agree on winding, so nothing is culled.
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            });

        Pipeline {
            material_bind_group_layout,
            pipeline,
        }
    }

    /// Creates missing GPU resources and uploads the camera. Must run before
    /// the render pass is opened.
    pub(crate) fn prepare(&mut self, render: &Renderer, data_map: &mut HashMap<u32, ViewData>) {
        if self.view_buffer.is_none() {
            let (camera_layout, view_buffer) = self.init_view_buffer(render);
            self.pipeline = Some(self.init_pipeline(render, &camera_layout));
            self.view_buffer = Some(view_buffer);
        }

        if let Some(pipeline) = self.pipeline.as_ref() {
            for data in data_map.values_mut() {
                if !data.has_resources() {
                    data.init_resources(render, &pipeline.material_bind_group_layout);
                }
            }
        }

        if let Some(view_buffer) = self.view_buffer.as_ref() {
            render.queue.write_buffer(
                &view_buffer.camera_buffer,
                0,
                bytemuck::cast_slice(&[self.uniform(render)]),
            );
        }
    }

    pub(crate) fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        data_map: &'a HashMap<u32, ViewData>,
    ) {
        let (Some(view_buffer), Some(pipeline)) = (self.view_buffer.as_ref(), self.pipeline.as_ref())
        else {
            return;
        };
        render_pass.set_pipeline(&pipeline.pipeline);
        render_pass.set_bind_group(0, &view_buffer.camera_bind_group, &[]);
        for data in data_map.values() {
            data.render(render_pass);
        }
    }

    fn uniform(&self, render: &Renderer) -> CameraUniform {
        let view = Matrix4::look_at_rh(self.viewport.position, self.viewport.target, self.camera_up);
        let aspect = render.w() as f32 / render.h().max(1) as f32;
        let proj = cgmath::perspective(
            self.viewport.fov,
            aspect,
            self.camera_near,
            self.viewport.far,
        );
        let light = |dir: Vector3<f32>| [dir.x, dir.y, dir.z, 0.0];
        let gray = |intensity: f32| [intensity, intensity, intensity, 1.0];

        CameraUniform {
            view_proj: (OPENGL_TO_WGPU_MATRIX * proj * view).into(),
            ambient: gray(self.ambient),
            key_dir: light(self.key_dir),
            key_color: gray(self.key_intensity),
            fill_dir: light(self.fill_dir),
            fill_color: gray(self.fill_intensity),
        }
    }
}

/// Box around everything in the scene.
pub(crate) fn scene_bounds(data_map: &HashMap<u32, ViewData>) -> BoundingVolume {
    let mut bbox = BoundingVolume::default();
    for data in data_map.values() {
        bbox.merge_box(&data.bbox);
    }
    bbox
}
