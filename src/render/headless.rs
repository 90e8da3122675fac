use std::collections::HashSet;

use anyhow::{anyhow, bail, Context, Result};
use glam::Vec4;
use log::debug;

use crate::material::DrawType;
use crate::mesh::Mesh;
use crate::uniforms::{UniformLayout, UniformSet};

use super::common::{
    BufferHandle, Capability, ClearFlags, DrawCall, Filter, GraphicsContext, ProgramHandle,
    ProgramSource, TextureDesc, TextureHandle,
};

/// Draw recorded by [`HeadlessContext`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub program: ProgramHandle,
    pub buffer: BufferHandle,
    pub draw_type: DrawType,
    pub index_count: usize,
    pub uniforms: UniformSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRecord {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub min: Filter,
    pub mag: Filter,
}

#[derive(Debug)]
struct HeadlessProgram {
    label: &'static str,
    layout: UniformLayout,
}

/// Graphics binding that validates and records calls without a GPU.
///
/// Used by the test suite and by the CLI when no window is available.
#[derive(Debug)]
pub struct HeadlessContext {
    display_size: (u32, u32),
    drawing_buffer_size: (u32, u32),
    viewport: (u32, u32, u32, u32),
    clear_color: Vec4,
    enabled: HashSet<Capability>,
    programs: Vec<HeadlessProgram>,
    buffers: Vec<usize>,
    textures: Vec<TextureRecord>,
    clears: Vec<ClearFlags>,
    draws: Vec<DrawRecord>,
    frame_draws: usize,
    frames_presented: u64,
}

impl Default for HeadlessContext {
    fn default() -> Self {
        Self::with_display_size(1280, 720)
    }
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context whose drawing buffer starts at 300x150 (the default
    /// canvas size) and is resized to `width`x`height` on request.
    pub fn with_display_size(width: u32, height: u32) -> Self {
        Self {
            display_size: (width, height),
            drawing_buffer_size: (300, 150),
            viewport: (0, 0, 300, 150),
            clear_color: Vec4::ZERO,
            enabled: HashSet::new(),
            programs: Vec::new(),
            buffers: Vec::new(),
            textures: Vec::new(),
            clears: Vec::new(),
            draws: Vec::new(),
            frame_draws: 0,
            frames_presented: 0,
        }
    }

    /// Simulates the host resizing the displayed surface.
    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.display_size = (width, height);
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn last_draw(&self) -> Option<&DrawRecord> {
        self.draws.last()
    }

    pub fn clears(&self) -> &[ClearFlags] {
        &self.clears
    }

    pub fn textures(&self) -> &[TextureRecord] {
        &self.textures
    }

    pub fn program_label(&self, program: ProgramHandle) -> Option<&'static str> {
        self.programs
            .get(program.0 as usize)
            .map(|program| program.label)
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.enabled.contains(&capability)
    }

    pub fn viewport(&self) -> (u32, u32, u32, u32) {
        self.viewport
    }

    pub fn clear_color(&self) -> Vec4 {
        self.clear_color
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl GraphicsContext for HeadlessContext {
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
        self.textures.push(TextureRecord {
            width: desc.width,
            height: desc.height,
            pixels: desc.pixels.to_vec(),
            min: desc.min,
            mag: desc.mag,
        });
        Ok(TextureHandle(self.textures.len() as u32 - 1))
    }

    fn create_program(&mut self, source: &ProgramSource) -> Result<ProgramHandle> {
        debug!("headless program `{}`", source.label);
        self.programs.push(HeadlessProgram {
            label: source.label,
            layout: UniformLayout::new(source.uniforms),
        });
        Ok(ProgramHandle(self.programs.len() as u32 - 1))
    }

    fn create_buffer(&mut self, mesh: &Mesh) -> Result<BufferHandle> {
        self.buffers.push(mesh.indices().len());
        Ok(BufferHandle(self.buffers.len() as u32 - 1))
    }

    fn resize_to_display_size(&mut self) -> bool {
        if self.drawing_buffer_size == self.display_size {
            return false;
        }
        self.drawing_buffer_size = self.display_size;
        true
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        self.drawing_buffer_size
    }

    fn display_size(&self) -> (u32, u32) {
        self.display_size
    }

    fn set_viewport(&mut self, x: u32, y: u32, width: u32, height: u32) {
        self.viewport = (x, y, width, height);
    }

    fn set_clear_color(&mut self, color: Vec4) {
        self.clear_color = color;
    }

    fn enable(&mut self, capability: Capability) {
        self.enabled.insert(capability);
    }

    fn disable(&mut self, capability: Capability) {
        self.enabled.remove(&capability);
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.clears.push(flags);
    }

    fn draw(&mut self, call: DrawCall<'_>) -> Result<()> {
        let program = self
            .programs
            .get(call.program.0 as usize)
            .ok_or_else(|| anyhow!("unknown program {:?}", call.program))?;
        let index_count = *self
            .buffers
            .get(call.buffer.0 as usize)
            .ok_or_else(|| anyhow!("unknown buffer {:?}", call.buffer))?;

        program
            .layout
            .pack(call.uniforms)
            .with_context(|| format!("program `{}` rejected its uniforms", program.label))?;
        for texture in program
            .layout
            .textures(call.uniforms)
            .with_context(|| format!("program `{}` rejected its textures", program.label))?
        {
            if texture.0 as usize >= self.textures.len() {
                bail!("unknown texture {texture:?}");
            }
        }

        self.draws.push(DrawRecord {
            program: call.program,
            buffer: call.buffer,
            draw_type: call.draw_type,
            index_count,
            uniforms: call.uniforms.clone(),
        });
        self.frame_draws += 1;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        debug!(
            "headless frame {} presented with {} draw(s)",
            self.frames_presented, self.frame_draws
        );
        self.frame_draws = 0;
        self.frames_presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniforms::{UniformDecl, UniformKind};

    const TEXTURED: ProgramSource = ProgramSource {
        label: "textured",
        vertex: "",
        fragment: "",
        uniforms: &[
            UniformDecl::new("u_tint", UniformKind::Vec4),
            UniformDecl::new("u_diffuse", UniformKind::Texture),
        ],
    };

    #[test]
    fn handles_are_sequential() {
        let mut gfx = HeadlessContext::new();
        let cube = Mesh::cube();
        assert_eq!(gfx.create_buffer(&cube).unwrap(), BufferHandle(0));
        assert_eq!(gfx.create_buffer(&cube).unwrap(), BufferHandle(1));
        assert_eq!(gfx.create_program(&TEXTURED).unwrap(), ProgramHandle(0));
        assert_eq!(gfx.program_label(ProgramHandle(0)), Some("textured"));
    }

    #[test]
    fn texture_size_must_match_pixels() {
        let mut gfx = HeadlessContext::new();
        let desc = TextureDesc {
            width: 2,
            height: 2,
            pixels: &[255; 12],
            min: Filter::Nearest,
            mag: Filter::Nearest,
        };
        assert!(gfx.create_texture(&desc).is_err());
    }

    #[test]
    fn draw_validates_uniforms_and_textures() {
        let mut gfx = HeadlessContext::new();
        let program = gfx.create_program(&TEXTURED).unwrap();
        let buffer = gfx.create_buffer(&Mesh::cube()).unwrap();

        let mut uniforms = UniformSet::new();
        uniforms.set("u_tint", Vec4::ONE);
        let err = gfx
            .draw(DrawCall {
                program,
                buffer,
                draw_type: DrawType::Triangles,
                uniforms: &uniforms,
            })
            .unwrap_err();
        assert!(format!("{err:#}").contains("u_diffuse"));

        uniforms.set("u_diffuse", TextureHandle(3));
        let err = gfx
            .draw(DrawCall {
                program,
                buffer,
                draw_type: DrawType::Triangles,
                uniforms: &uniforms,
            })
            .unwrap_err();
        assert!(err.to_string().contains("unknown texture"));
        assert!(gfx.draws().is_empty());
    }

    #[test]
    fn draw_records_index_count_and_uniform_snapshot() {
        let mut gfx = HeadlessContext::new();
        let program = gfx.create_program(&TEXTURED).unwrap();
        let buffer = gfx.create_buffer(&Mesh::cube()).unwrap();
        let texture = gfx
            .create_texture(&TextureDesc {
                width: 1,
                height: 1,
                pixels: &[1, 2, 3, 4],
                min: Filter::Linear,
                mag: Filter::Linear,
            })
            .unwrap();

        let mut uniforms = UniformSet::new();
        uniforms.set("u_tint", Vec4::ONE);
        uniforms.set("u_diffuse", texture);
        gfx.draw(DrawCall {
            program,
            buffer,
            draw_type: DrawType::Points,
            uniforms: &uniforms,
        })
        .unwrap();
        uniforms.set("u_tint", Vec4::ZERO);

        let draw = gfx.last_draw().unwrap();
        assert_eq!(draw.index_count, 36);
        assert_eq!(draw.draw_type, DrawType::Points);
        assert_eq!(
            draw.uniforms.get("u_tint"),
            Some(&crate::uniforms::UniformValue::Vec4(Vec4::ONE))
        );
    }

    #[test]
    fn unknown_handles_are_rejected() {
        let mut gfx = HeadlessContext::new();
        let uniforms = UniformSet::new();
        let err = gfx
            .draw(DrawCall {
                program: ProgramHandle(9),
                buffer: BufferHandle(0),
                draw_type: DrawType::Triangles,
                uniforms: &uniforms,
            })
            .unwrap_err();
        assert!(err.to_string().contains("unknown program"));
    }

    #[test]
    fn resize_reports_changes_once() {
        let mut gfx = HeadlessContext::with_display_size(640, 480);
        assert_eq!(gfx.drawing_buffer_size(), (300, 150));
        assert!(gfx.resize_to_display_size());
        assert!(!gfx.resize_to_display_size());
        assert_eq!(gfx.drawing_buffer_size(), (640, 480));
        gfx.set_display_size(800, 600);
        assert!(gfx.resize_to_display_size());
    }

    #[test]
    fn capabilities_toggle() {
        let mut gfx = HeadlessContext::new();
        gfx.enable(Capability::CullFace);
        assert!(gfx.is_enabled(Capability::CullFace));
        gfx.disable(Capability::CullFace);
        assert!(!gfx.is_enabled(Capability::CullFace));
    }
}
