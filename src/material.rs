use crate::render::{BufferHandle, ProgramHandle};
use crate::uniforms::SharedUniforms;

/// Primitive topology a buffer is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawType {
    #[default]
    Triangles,
    TriangleStrip,
    Lines,
    LineStrip,
    Points,
}

/// A compiled program bound to the uniforms it is drawn with.
#[derive(Debug, Clone)]
pub struct Material {
    pub program: ProgramHandle,
    pub uniforms: SharedUniforms,
}

impl Material {
    pub fn new(program: ProgramHandle, uniforms: SharedUniforms) -> Self {
        Self { program, uniforms }
    }
}

/// A material bound to a mesh buffer and a draw mode.
#[derive(Debug, Clone)]
pub struct RenderObject {
    pub material: Material,
    pub buffer: BufferHandle,
    pub draw_type: DrawType,
}

impl RenderObject {
    pub fn new(material: Material, buffer: BufferHandle, draw_type: DrawType) -> Self {
        Self {
            material,
            buffer,
            draw_type,
        }
    }
}
