use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};
use parking_lot::RwLock;
use thiserror::Error;

use crate::render::TextureHandle;

/// Value bound to a named shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    Texture(TextureHandle),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            Self::Float(_) => UniformKind::Float,
            Self::Vec3(_) => UniformKind::Vec3,
            Self::Vec4(_) => UniformKind::Vec4,
            Self::Mat4(_) => UniformKind::Mat4,
            Self::Texture(_) => UniformKind::Texture,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

impl From<Vec4> for UniformValue {
    fn from(value: Vec4) -> Self {
        Self::Vec4(value)
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        Self::Mat4(value)
    }
}

impl From<TextureHandle> for UniformValue {
    fn from(value: TextureHandle) -> Self {
        Self::Texture(value)
    }
}

/// Named uniform values handed to a program for one draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformSet {
    values: BTreeMap<String, UniformValue>,
}

impl UniformSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<UniformValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    pub fn mat4(&self, name: &str) -> Option<Mat4> {
        match self.values.get(name) {
            Some(UniformValue::Mat4(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates the values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Uniform set shared between the scene that writes it every frame and the
/// material that reads it at draw time.
pub type SharedUniforms = Arc<RwLock<UniformSet>>;

pub fn shared(set: UniformSet) -> SharedUniforms {
    Arc::new(RwLock::new(set))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
    Float,
    Vec3,
    Vec4,
    Mat4,
    Texture,
}

impl UniformKind {
    /// Alignment and size in the uniform address space.
    fn align_and_size(self) -> Option<(u64, u64)> {
        match self {
            Self::Float => Some((4, 4)),
            Self::Vec3 => Some((16, 12)),
            Self::Vec4 => Some((16, 16)),
            Self::Mat4 => Some((16, 64)),
            Self::Texture => None,
        }
    }
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float => "float",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
            Self::Mat4 => "mat4",
            Self::Texture => "texture",
        };
        f.write_str(name)
    }
}

/// Uniform a program declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformDecl {
    pub name: &'static str,
    pub kind: UniformKind,
}

impl UniformDecl {
    pub const fn new(name: &'static str, kind: UniformKind) -> Self {
        Self { name, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UniformError {
    #[error("uniform `{0}` is not set")]
    Missing(String),
    #[error("uniform `{name}` expects {expected} but was given {found}")]
    KindMismatch {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    pub name: &'static str,
    pub kind: UniformKind,
    pub offset: u64,
}

/// Byte layout of a program's uniform block.
///
/// Non-texture uniforms become members of a single struct in declaration
/// order; textures become texture slots in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformLayout {
    entries: Vec<LayoutEntry>,
    textures: Vec<&'static str>,
    size: u64,
}

impl UniformLayout {
    /// Smallest block handed to the GPU, even for programs without uniforms.
    const MIN_SIZE: u64 = 16;

    pub fn new(decls: &[UniformDecl]) -> Self {
        let mut entries = Vec::new();
        let mut textures = Vec::new();
        let mut offset = 0;
        let mut struct_align = Self::MIN_SIZE;

        for decl in decls {
            match decl.kind.align_and_size() {
                Some((align, size)) => {
                    offset = align_to(offset, align);
                    entries.push(LayoutEntry {
                        name: decl.name,
                        kind: decl.kind,
                        offset,
                    });
                    offset += size;
                    struct_align = struct_align.max(align);
                }
                None => textures.push(decl.name),
            }
        }

        Self {
            entries,
            textures,
            size: align_to(offset, struct_align).max(Self::MIN_SIZE),
        }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    pub fn texture_names(&self) -> &[&'static str] {
        &self.textures
    }

    /// Serializes the block members from `uniforms`. Names not declared by
    /// the program are ignored.
    pub fn pack(&self, uniforms: &UniformSet) -> Result<Vec<u8>, UniformError> {
        let mut bytes = vec![0u8; self.size as usize];
        for entry in &self.entries {
            let value = lookup(uniforms, entry.name, entry.kind)?;
            let start = entry.offset as usize;
            match value {
                UniformValue::Float(value) => write(&mut bytes, start, &[value]),
                UniformValue::Vec3(value) => write(&mut bytes, start, &value.to_array()),
                UniformValue::Vec4(value) => write(&mut bytes, start, &value.to_array()),
                UniformValue::Mat4(value) => write(&mut bytes, start, &value.to_cols_array()),
                UniformValue::Texture(_) => {}
            }
        }
        Ok(bytes)
    }

    /// Resolves the texture bound to each texture slot.
    pub fn textures(&self, uniforms: &UniformSet) -> Result<Vec<TextureHandle>, UniformError> {
        self.textures
            .iter()
            .map(|name| match lookup(uniforms, name, UniformKind::Texture)? {
                UniformValue::Texture(handle) => Ok(handle),
                other => Err(UniformError::KindMismatch {
                    name: name.to_string(),
                    expected: UniformKind::Texture,
                    found: other.kind(),
                }),
            })
            .collect()
    }
}

fn lookup(
    uniforms: &UniformSet,
    name: &str,
    expected: UniformKind,
) -> Result<UniformValue, UniformError> {
    let value = *uniforms
        .get(name)
        .ok_or_else(|| UniformError::Missing(name.to_string()))?;
    if value.kind() != expected {
        return Err(UniformError::KindMismatch {
            name: name.to_string(),
            expected,
            found: value.kind(),
        });
    }
    Ok(value)
}

fn write(bytes: &mut [u8], start: usize, values: &[f32]) {
    let src: &[u8] = bytemuck::cast_slice(values);
    bytes[start..start + src.len()].copy_from_slice(src);
}

fn align_to(value: u64, align: u64) -> u64 {
    (value + align - 1) / align * align
}
