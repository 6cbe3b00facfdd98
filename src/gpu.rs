//! GPU surface and draw submission.
//!
//! [`GpuState`] owns the wgpu surface, device, and the two pipelines the
//! backdrop needs: instanced quads for point markers (rounded in the
//! fragment shader) and a line list for neighbor connections. The geometry
//! itself is built on the CPU by [`render`](crate::render); this module only
//! uploads the vertex streams and submits one render pass per frame.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use winit::window::Window;

use crate::error::GpuError;
use crate::render::{LineVertex, MarkerInstance};
use crate::visuals::Theme;

/// Marker radius in pixels.
const MARKER_RADIUS: f32 = 2.5;

const SHADER_SOURCE: &str = r#"
struct Uniforms {
    resolution: vec2<f32>,
    marker_radius: f32,
    _pad: f32,
    marker_color: vec4<f32>,
    line_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

fn to_clip(pixel: vec2<f32>) -> vec4<f32> {
    let ndc = vec2<f32>(
        pixel.x / uniforms.resolution.x * 2.0 - 1.0,
        1.0 - pixel.y / uniforms.resolution.y * 2.0,
    );
    return vec4<f32>(ndc, 0.0, 1.0);
}

struct MarkerOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_marker(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec2<f32>,
) -> MarkerOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let quad_pos = quad_vertices[vertex_index];

    var out: MarkerOutput;
    out.clip_position = to_clip(center + quad_pos * uniforms.marker_radius);
    out.uv = quad_pos;
    return out;
}

@fragment
fn fs_marker(in: MarkerOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let alpha = 1.0 - smoothstep(0.6, 1.0, dist);
    return vec4<f32>(uniforms.marker_color.rgb, uniforms.marker_color.a * alpha);
}

@vertex
fn vs_line(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
    return to_clip(position);
}

@fragment
fn fs_line() -> @location(0) vec4<f32> {
    return uniforms.line_color;
}
"#;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    resolution: Vec2,
    marker_radius: f32,
    _pad: f32,
    marker_color: [f32; 4],
    line_color: [f32; 4],
}

/// GPU resources for one window surface.
pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    marker_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    marker_buffer: Option<wgpu::Buffer>,
    marker_capacity: usize,
    line_buffer: Option<wgpu::Buffer>,
    line_capacity: usize,
    theme: Theme,
}

impl GpuState {
    /// Acquire a device and build the marker and line pipelines for `window`.
    pub async fn new(window: Arc<Window>, theme: Theme) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Uniform Buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Backdrop Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Backdrop Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let blend = Some(wgpu::BlendState::ALPHA_BLENDING);
        let targets = [Some(wgpu::ColorTargetState {
            format: config.format,
            blend,
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let marker_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Marker Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_marker"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MarkerInstance>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x2,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_marker"),
                targets: &targets,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_line"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x2,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_line"),
                targets: &targets,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            marker_pipeline,
            line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            marker_buffer: None,
            marker_capacity: 0,
            line_buffer: None,
            line_capacity: 0,
            theme,
        })
    }

    /// Reconfigure the surface for a new size. Zero-sized requests are
    /// ignored; the old configuration stays valid.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Recreate the vertex buffers when the grid outgrew them. A resize that
    /// shrinks the grid keeps the larger buffers.
    fn ensure_capacity(&mut self, markers: usize, line_verts: usize) {
        if markers > self.marker_capacity {
            self.marker_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Marker Instance Buffer"),
                size: (markers * std::mem::size_of::<MarkerInstance>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.marker_capacity = markers;
        }
        if line_verts > self.line_capacity {
            self.line_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Line Vertex Buffer"),
                size: (line_verts * std::mem::size_of::<LineVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.line_capacity = line_verts;
        }
    }

    /// Upload this frame's geometry and draw it: lines first, markers on
    /// top.
    pub fn render(
        &mut self,
        markers: &[MarkerInstance],
        lines: &[LineVertex],
        line_capacity: usize,
    ) -> Result<(), wgpu::SurfaceError> {
        self.ensure_capacity(markers.len(), line_capacity.max(lines.len()));

        let uniforms = Uniforms {
            resolution: Vec2::new(self.config.width as f32, self.config.height as f32),
            marker_radius: MARKER_RADIUS,
            _pad: 0.0,
            marker_color: self.theme.marker_color(),
            line_color: self.theme.line_color(),
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        if let (Some(buffer), false) = (&self.marker_buffer, markers.is_empty()) {
            self.queue.write_buffer(buffer, 0, bytemuck::cast_slice(markers));
        }
        if let (Some(buffer), false) = (&self.line_buffer, lines.is_empty()) {
            self.queue.write_buffer(buffer, 0, bytemuck::cast_slice(lines));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Backdrop Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Backdrop Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.theme.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            if let (Some(buffer), false) = (&self.line_buffer, lines.is_empty()) {
                let bytes = (lines.len() * std::mem::size_of::<LineVertex>()) as u64;
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..bytes));
                render_pass.draw(0..lines.len() as u32, 0..1);
            }

            if let (Some(buffer), false) = (&self.marker_buffer, markers.is_empty()) {
                let bytes = (markers.len() * std::mem::size_of::<MarkerInstance>()) as u64;
                render_pass.set_pipeline(&self.marker_pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..bytes));
                render_pass.draw(0..6, 0..markers.len() as u32);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
