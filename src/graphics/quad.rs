//! Instanced textured-quad pipeline.

use bytemuck::{Pod, Zeroable};

use crate::color::Color;
use crate::layout::Rect;
use crate::texture::Texture;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadInstance {
    pub pos: [f32; 2],
    pub size: [f32; 2],
    pub tint: [f32; 4],
}

impl QuadInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2, // size
        2 => Float32x4, // tint
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    pub fn new(rect: Rect, tint: Color) -> Self {
        Self {
            pos: [rect.x, rect.y],
            size: [rect.width, rect.height],
            tint: tint.to_linear(),
        }
    }
}

/// One textured quad for the current frame.
#[derive(Clone, Copy)]
pub struct QuadDraw<'a> {
    pub texture: &'a Texture,
    pub rect: Rect,
    pub tint: Color,
}

/// Screen uniform: `[2/w, 2/h, 1/w, 1/h]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub(crate) struct ScreenGlobals {
    pub screen: [f32; 4],
}

impl ScreenGlobals {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        Self {
            screen: [2.0 / w, 2.0 / h, 1.0 / w, 1.0 / h],
        }
    }
}

pub struct QuadRenderer {
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) texture_bind_group_layout: wgpu::BindGroupLayout,
    pub(crate) globals_bind_group: wgpu::BindGroup,
    pub(crate) globals_buffer: wgpu::Buffer,
    pub(crate) instance_buffer: wgpu::Buffer,
    pub(crate) pipeline: wgpu::RenderPipeline,
    max_instances: u32,
}

impl QuadRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, max_instances: u32) -> Self {
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("quad_texture_bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quad_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            lod_min_clamp: 0.0,
            lod_max_clamp: 32.0,
            compare: None,
            anisotropy_clamp: 1,
            border_color: None,
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quad_globals_ubo"),
            size: std::mem::size_of::<ScreenGlobals>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("quad_globals_bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quad_globals_bg"),
            layout: &globals_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let instance_buffer = create_instance_buffer(device, max_instances);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/quad.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_pipeline_layout"),
            bind_group_layouts: &[&texture_bind_group_layout, &globals_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[QuadInstance::layout()],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            sampler,
            texture_bind_group_layout,
            globals_bind_group,
            globals_buffer,
            instance_buffer,
            pipeline,
            max_instances,
        }
    }

    pub fn create_texture_bind_group(
        &self,
        device: &wgpu::Device,
        view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quad_texture_bg"),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    /// Uploads this frame's screen size and instances, growing the instance
    /// buffer when needed.
    pub(crate) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        globals: ScreenGlobals,
        instances: &[QuadInstance],
    ) {
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        if instances.is_empty() {
            return;
        }
        let needed = instances.len() as u32;
        if needed > self.max_instances {
            self.max_instances = needed.next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.max_instances);
        }
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, draws: &[QuadDraw<'_>]) {
        if draws.is_empty() {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(1, &self.globals_bind_group, &[]);
        rpass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        for (i, draw) in draws.iter().enumerate() {
            let i = i as u32;
            rpass.set_bind_group(0, &draw.texture.bind_group, &[]);
            rpass.draw(0..4, i..i + 1);
        }
    }
}

fn create_instance_buffer(device: &wgpu::Device, max_instances: u32) -> wgpu::Buffer {
    let stride = std::mem::size_of::<QuadInstance>() as wgpu::BufferAddress;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("quad_instance_buffer"),
        size: stride * max_instances.max(1) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_from_rect() {
        let inst = QuadInstance::new(Rect::new(10.0, 20.0, 30.0, 40.0), Color::RED);
        assert_eq!(inst.pos, [10.0, 20.0]);
        assert_eq!(inst.size, [30.0, 40.0]);
        assert_eq!(inst.tint, Color::RED.to_linear());
    }

    #[test]
    fn test_instance_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<QuadInstance>(), 32);
    }

    #[test]
    fn test_screen_globals() {
        let g = ScreenGlobals::new(200, 100);
        assert_eq!(g.screen, [0.01, 0.02, 0.005, 0.01]);
        // Zero-sized surfaces are clamped rather than dividing by zero.
        assert!(ScreenGlobals::new(0, 0).screen.iter().all(|v| v.is_finite()));
    }
}
