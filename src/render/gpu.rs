use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use glam::Vec4;
use log::{debug, info, trace};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::material::DrawType;
use crate::mesh::{Mesh, Vertex};
use crate::uniforms::UniformLayout;

use super::common::{
    BufferHandle, Capability, ClearFlags, DrawCall, Filter, GraphicsContext, ProgramHandle,
    ProgramSource, TextureDesc, TextureHandle,
};

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

/// wgpu binding for a winit window (native) or canvas (WebGL).
///
/// Draws are queued by [`GraphicsContext::draw`] and submitted in a single
/// render pass by [`GraphicsContext::present`].
pub struct GpuContext {
    // declared before `window` so the surface is dropped first
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth: DepthBuffer,
    viewport: (u32, u32, u32, u32),
    clear_color: Vec4,
    pending_clear: ClearFlags,
    depth_test: bool,
    cull_face: bool,
    programs: Vec<GpuProgram>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    buffers: Vec<MeshBuffers>,
    textures: Vec<GpuTexture>,
    pending: Vec<PendingDraw>,
    window: Arc<Window>,
}

impl GpuContext {
    /// Initializes the device and surface for the provided window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            bail!("window has zero area");
        }

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        // SAFETY: the window is kept alive by the `Arc` stored next to the
        // surface, and the surface field is dropped before it.
        let surface = unsafe { instance.create_surface(window.as_ref()) }
            .context("failed to create rendering surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to acquire GPU adapter")?;

        let limits = if cfg!(target_arch = "wasm32") {
            wgpu::Limits::downlevel_webgl2_defaults()
        } else {
            wgpu::Limits::default()
        };
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("mini-raid-device"),
                    features: wgpu::Features::empty(),
                    limits: limits.using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = pick_surface_format(&surface_caps.formats)
            .context("surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        info!(
            "configured {:?} surface {}x{} on {:?}",
            surface_format,
            size.width,
            size.height,
            adapter.get_info().backend
        );

        let depth = DepthBuffer::create(&device, config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            viewport: (0, 0, config.width, config.height),
            config,
            depth,
            clear_color: Vec4::ZERO,
            pending_clear: ClearFlags::default(),
            depth_test: false,
            cull_face: false,
            programs: Vec::new(),
            pipelines: HashMap::new(),
            buffers: Vec::new(),
            textures: Vec::new(),
            pending: Vec::new(),
            window,
        })
    }

    /// Returns the identifier of the window owned by the context.
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resizes the swap chain to match the new dimensions.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
        sync_canvas_size(&self.window, new_size);
    }

    fn ensure_pipeline(&mut self, key: PipelineKey) -> Result<()> {
        if self.pipelines.contains_key(&key) {
            return Ok(());
        }
        let program = self
            .programs
            .get(key.program.0 as usize)
            .ok_or_else(|| anyhow!("unknown program {:?}", key.program))?;
        debug!("creating pipeline for `{}`: {key:?}", program.label);

        let strip_index_format = matches!(key.draw_type, DrawType::TriangleStrip | DrawType::LineStrip)
            .then_some(wgpu::IndexFormat::Uint16);
        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("{}-pipeline", program.label)),
                layout: Some(&program.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &program.vertex,
                    entry_point: "vs_main",
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: Vertex::STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &VERTEX_ATTRIBUTES,
                    }],
                },
                primitive: wgpu::PrimitiveState {
                    topology: topology(key.draw_type),
                    strip_index_format,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: key.cull_face.then_some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthBuffer::FORMAT,
                    depth_write_enabled: key.depth_test,
                    depth_compare: if key.depth_test {
                        wgpu::CompareFunction::Less
                    } else {
                        wgpu::CompareFunction::Always
                    },
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &program.fragment,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                multiview: None,
            });
        self.pipelines.insert(key, pipeline);
        Ok(())
    }

    fn viewport_rect(&self) -> Option<(f32, f32, f32, f32)> {
        let (x, y, width, height) = self.viewport;
        let width = width.min(self.config.width.saturating_sub(x));
        let height = height.min(self.config.height.saturating_sub(y));
        (width > 0 && height > 0).then(|| (x as f32, y as f32, width as f32, height as f32))
    }
}

impl GraphicsContext for GpuContext {
    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> Result<TextureHandle> {
        let expected = desc.width as usize * desc.height as usize * 4;
        if desc.pixels.len() != expected {
            bail!(
                "texture data has {} bytes, expected {expected} for {}x{} RGBA",
                desc.pixels.len(),
                desc.width,
                desc.height
            );
        }
        let size = wgpu::Extent3d {
            width: desc.width,
            height: desc.height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("scene-texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            desc.pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * desc.width),
                rows_per_image: Some(desc.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("scene-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter_mode(desc.mag),
            min_filter: filter_mode(desc.min),
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        self.textures.push(GpuTexture {
            _texture: texture,
            view,
            sampler,
        });
        Ok(TextureHandle(self.textures.len() as u32 - 1))
    }

    fn create_program(&mut self, source: &ProgramSource) -> Result<ProgramHandle> {
        let layout = UniformLayout::new(source.uniforms);
        let vertex = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{}-vertex", source.label)),
                source: wgpu::ShaderSource::Wgsl(source.vertex.into()),
            });
        let fragment = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{}-fragment", source.label)),
                source: wgpu::ShaderSource::Wgsl(source.fragment.into()),
            });

        let uniform_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("uniform-bind-layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(layout.size()),
                    },
                    count: None,
                }],
            });

        // Texture slot N uses bindings 2N (view) and 2N + 1 (sampler).
        let texture_layout = (!layout.texture_names().is_empty()).then(|| {
            let entries: Vec<_> = (0..layout.texture_names().len() as u32)
                .flat_map(|slot| {
                    [
                        wgpu::BindGroupLayoutEntry {
                            binding: slot * 2,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: slot * 2 + 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ]
                })
                .collect();
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("texture-bind-layout"),
                    entries: &entries,
                })
        });

        let mut bind_group_layouts = vec![&uniform_layout];
        bind_group_layouts.extend(texture_layout.as_ref());
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{}-pipeline-layout", source.label)),
                bind_group_layouts: &bind_group_layouts,
                push_constant_ranges: &[],
            });

        debug!(
            "program `{}`: {} byte uniform block, {} texture slot(s)",
            source.label,
            layout.size(),
            layout.texture_names().len()
        );
        self.programs.push(GpuProgram {
            label: source.label,
            layout,
            vertex,
            fragment,
            uniform_layout,
            texture_layout,
            pipeline_layout,
        });
        Ok(ProgramHandle(self.programs.len() as u32 - 1))
    }

    fn create_buffer(&mut self, mesh: &Mesh) -> Result<BufferHandle> {
        let label = format!("mesh-{}", self.buffers.len());
        self.buffers
            .push(MeshBuffers::from_mesh(&self.device, mesh, &label));
        Ok(BufferHandle(self.buffers.len() as u32 - 1))
    }

    fn resize_to_display_size(&mut self) -> bool {
        let size = displayed_size(&self.window);
        if size.width == 0
            || size.height == 0
            || (size.width == self.config.width && size.height == self.config.height)
        {
            return false;
        }
        self.resize(size);
        true
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn display_size(&self) -> (u32, u32) {
        let size = displayed_size(&self.window);
        (size.width, size.height)
    }

    fn set_viewport(&mut self, x: u32, y: u32, width: u32, height: u32) {
        self.viewport = (x, y, width, height);
    }

    fn set_clear_color(&mut self, color: Vec4) {
        self.clear_color = color;
    }

    fn enable(&mut self, capability: Capability) {
        match capability {
            Capability::DepthTest => self.depth_test = true,
            Capability::CullFace => self.cull_face = true,
        }
    }

    fn disable(&mut self, capability: Capability) {
        match capability {
            Capability::DepthTest => self.depth_test = false,
            Capability::CullFace => self.cull_face = false,
        }
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.pending_clear = self.pending_clear | flags;
    }

    fn draw(&mut self, call: DrawCall<'_>) -> Result<()> {
        let program = self
            .programs
            .get(call.program.0 as usize)
            .ok_or_else(|| anyhow!("unknown program {:?}", call.program))?;
        if call.buffer.0 as usize >= self.buffers.len() {
            bail!("unknown buffer {:?}", call.buffer);
        }

        let bytes = program
            .layout
            .pack(call.uniforms)
            .with_context(|| format!("program `{}` rejected its uniforms", program.label))?;
        let textures = program
            .layout
            .textures(call.uniforms)
            .with_context(|| format!("program `{}` rejected its textures", program.label))?;

        let uniform_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("object-uniform"),
                contents: &bytes,
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let uniform_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object-bind-group"),
            layout: &program.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_bind_group = match &program.texture_layout {
            Some(layout) => {
                let mut entries = Vec::with_capacity(textures.len() * 2);
                for (slot, handle) in textures.iter().enumerate() {
                    let texture = self
                        .textures
                        .get(handle.0 as usize)
                        .ok_or_else(|| anyhow!("unknown texture {handle:?}"))?;
                    entries.push(wgpu::BindGroupEntry {
                        binding: slot as u32 * 2,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    });
                    entries.push(wgpu::BindGroupEntry {
                        binding: slot as u32 * 2 + 1,
                        resource: wgpu::BindingResource::Sampler(&texture.sampler),
                    });
                }
                Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("texture-bind-group"),
                    layout,
                    entries: &entries,
                }))
            }
            None => None,
        };

        let key = PipelineKey {
            program: call.program,
            draw_type: call.draw_type,
            depth_test: self.depth_test,
            cull_face: self.cull_face,
        };
        self.ensure_pipeline(key)?;
        trace!("queued draw {key:?} with buffer {:?}", call.buffer);
        self.pending.push(PendingDraw {
            key,
            buffer: call.buffer,
            uniform_bind_group,
            texture_bind_group,
        });
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);
        let clear = std::mem::take(&mut self.pending_clear);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                info!("Surface timeout; skipping frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => bail!("GPU is out of memory"),
            #[allow(unreachable_patterns)]
            Err(err) => bail!("failed to acquire surface texture: {err}"),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        let color_load = if clear.color {
            let [r, g, b, a] = self.clear_color.as_dvec4().to_array();
            wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a })
        } else {
            wgpu::LoadOp::Load
        };
        let depth_load = if clear.depth {
            wgpu::LoadOp::Clear(1.0)
        } else {
            wgpu::LoadOp::Load
        };

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });

            if let Some((x, y, width, height)) = self.viewport_rect() {
                pass.set_viewport(x, y, width, height, 0.0, 1.0);
            }

            for draw in &pending {
                let Some(pipeline) = self.pipelines.get(&draw.key) else {
                    continue;
                };
                let mesh = &self.buffers[draw.buffer.0 as usize];
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &draw.uniform_bind_group, &[]);
                if let Some(textures) = &draw.texture_bind_group {
                    pass.set_bind_group(1, textures, &[]);
                }
                pass.set_vertex_buffer(0, mesh.vertex.slice(..));
                pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Colours are written to the surface as computed, without sRGB encoding.
/// An sRGB-only surface falls back to its first format.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

fn topology(draw_type: DrawType) -> wgpu::PrimitiveTopology {
    match draw_type {
        DrawType::Triangles => wgpu::PrimitiveTopology::TriangleList,
        DrawType::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        DrawType::Lines => wgpu::PrimitiveTopology::LineList,
        DrawType::LineStrip => wgpu::PrimitiveTopology::LineStrip,
        DrawType::Points => wgpu::PrimitiveTopology::PointList,
    }
}

fn filter_mode(filter: Filter) -> wgpu::FilterMode {
    match filter {
        Filter::Nearest => wgpu::FilterMode::Nearest,
        Filter::Linear => wgpu::FilterMode::Linear,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn displayed_size(window: &Window) -> PhysicalSize<u32> {
    window.inner_size()
}

/// CSS size of the canvas in device pixels.
#[cfg(target_arch = "wasm32")]
fn displayed_size(window: &Window) -> PhysicalSize<u32> {
    use winit::platform::web::WindowExtWebSys;

    let canvas = window.canvas();
    let ratio = web_sys::window()
        .map(|window| window.device_pixel_ratio())
        .unwrap_or(1.0);
    PhysicalSize::new(
        (f64::from(canvas.client_width()) * ratio).round() as u32,
        (f64::from(canvas.client_height()) * ratio).round() as u32,
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn sync_canvas_size(_window: &Window, _size: PhysicalSize<u32>) {}

#[cfg(target_arch = "wasm32")]
fn sync_canvas_size(window: &Window, size: PhysicalSize<u32>) {
    use winit::platform::web::WindowExtWebSys;

    let canvas = window.canvas();
    canvas.set_width(size.width);
    canvas.set_height(size.height);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PipelineKey {
    program: ProgramHandle,
    draw_type: DrawType,
    depth_test: bool,
    cull_face: bool,
}

struct GpuProgram {
    label: &'static str,
    layout: UniformLayout,
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: Option<wgpu::BindGroupLayout>,
    pipeline_layout: wgpu::PipelineLayout,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

struct PendingDraw {
    key: PipelineKey,
    buffer: BufferHandle,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group: Option<wgpu::BindGroup>,
}

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn from_mesh(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: mesh.indices().len() as u32,
        }
    }
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_types_map_to_topologies() {
        assert_eq!(
            topology(DrawType::Triangles),
            wgpu::PrimitiveTopology::TriangleList
        );
        assert_eq!(topology(DrawType::Points), wgpu::PrimitiveTopology::PointList);
        assert_eq!(
            topology(DrawType::LineStrip),
            wgpu::PrimitiveTopology::LineStrip
        );
    }

    #[test]
    fn surface_format_skips_srgb_variants() {
        use wgpu::TextureFormat::*;

        assert_eq!(
            pick_surface_format(&[Bgra8UnormSrgb, Bgra8Unorm, Rgba8UnormSrgb]),
            Some(Bgra8Unorm)
        );
        assert_eq!(
            pick_surface_format(&[Rgba8UnormSrgb, Rgba8Unorm]),
            Some(Rgba8Unorm)
        );
        assert_eq!(pick_surface_format(&[Bgra8UnormSrgb]), Some(Bgra8UnormSrgb));
        assert_eq!(pick_surface_format(&[]), None);
    }

    #[test]
    fn filters_map_to_wgpu_modes() {
        assert_eq!(filter_mode(Filter::Nearest), wgpu::FilterMode::Nearest);
        assert_eq!(filter_mode(Filter::Linear), wgpu::FilterMode::Linear);
    }

    #[test]
    fn vertex_attributes_follow_the_vertex_struct() {
        let offsets: Vec<_> = VERTEX_ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        assert_eq!(Vertex::STRIDE, 32);
    }
}
