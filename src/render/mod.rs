pub mod common;
pub mod gpu;
pub mod headless;
pub mod renderer;
pub mod shaders;

pub use common::{
    BufferHandle, Capability, ClearFlags, DrawCall, Filter, GraphicsContext, ProgramHandle,
    ProgramSource, TextureDesc, TextureHandle,
};
pub use gpu::GpuContext;
pub use headless::{DrawRecord, HeadlessContext, TextureRecord};
pub use renderer::Renderer;
pub use shaders::PHONG;
