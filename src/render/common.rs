use anyhow::Result;
use glam::Vec4;

use crate::material::DrawType;
use crate::mesh::Mesh;
use crate::uniforms::{UniformDecl, UniformSet};

/// Linked shader program issued by a [`GraphicsContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Texture issued by a [`GraphicsContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// GPU-resident mesh buffer issued by a [`GraphicsContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    Nearest,
    #[default]
    Linear,
}

/// RGBA8 texture upload.
#[derive(Debug, Clone, Copy)]
pub struct TextureDesc<'a> {
    pub width: u32,
    pub height: u32,
    pub pixels: &'a [u8],
    pub min: Filter,
    pub mag: Filter,
}

/// Vertex/fragment source pair plus the uniforms the pair reads.
///
/// The uniform list stands in for program reflection: it fixes the order and
/// type of the uniform block members and the texture slots.
#[derive(Debug, Clone, Copy)]
pub struct ProgramSource {
    pub label: &'static str,
    pub vertex: &'static str,
    pub fragment: &'static str,
    pub uniforms: &'static [UniformDecl],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DepthTest,
    CullFace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearFlags {
    pub color: bool,
    pub depth: bool,
}

impl ClearFlags {
    pub const COLOR: Self = Self {
        color: true,
        depth: false,
    };
    pub const DEPTH: Self = Self {
        color: false,
        depth: true,
    };
    pub const ALL: Self = Self {
        color: true,
        depth: true,
    };
}

impl std::ops::BitOr for ClearFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            color: self.color || rhs.color,
            depth: self.depth || rhs.depth,
        }
    }
}

/// One draw: a program with its uniforms over a mesh buffer.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub program: ProgramHandle,
    pub buffer: BufferHandle,
    pub draw_type: DrawType,
    pub uniforms: &'a UniformSet,
}

/// Graphics binding the scene renders through.
///
/// Resource creation, uniform validation and draw submission all live behind
/// this trait; the scene code performs no checks of its own and propagates
/// whatever the binding reports.
pub trait GraphicsContext {
    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> Result<TextureHandle>;

    fn create_program(&mut self, source: &ProgramSource) -> Result<ProgramHandle>;

    fn create_buffer(&mut self, mesh: &Mesh) -> Result<BufferHandle>;

    /// Matches the drawing buffer to the displayed size. Returns `true` when
    /// the drawing buffer changed.
    fn resize_to_display_size(&mut self) -> bool;

    /// Size of the drawing buffer in pixels.
    fn drawing_buffer_size(&self) -> (u32, u32);

    /// Size the surface is displayed at, used for the projection aspect.
    fn display_size(&self) -> (u32, u32);

    fn set_viewport(&mut self, x: u32, y: u32, width: u32, height: u32);

    fn set_clear_color(&mut self, color: Vec4);

    fn enable(&mut self, capability: Capability);

    fn disable(&mut self, capability: Capability);

    fn clear(&mut self, flags: ClearFlags);

    fn draw(&mut self, call: DrawCall<'_>) -> Result<()>;

    /// Submits the frame recorded since the previous call.
    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}
