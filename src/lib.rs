//! A minimal real-time 3D scene framework.
//!
//! A [`Renderer`] owns an ordered list of [`RenderObject`]s (a program, its
//! shared uniforms and a mesh buffer) and draws them through a
//! [`GraphicsContext`]. [`App`] drives a [`Scene`] through init, update and
//! render; [`CubeScene`] is the bundled demo: a textured cube spinning under a
//! point light.
//!
//! The wgpu binding ([`GpuContext`]) runs natively and on WebGL; the
//! [`HeadlessContext`] records calls instead and is what the tests use.

pub mod app;
pub mod config;
pub mod demo;
pub mod material;
pub mod math;
pub mod mesh;
pub mod render;
pub mod uniforms;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::{run_headless, App, FrameClock, FrameTime, LabelLog, Overlay, Scene};
pub use config::SceneConfig;
pub use demo::CubeScene;
pub use material::{DrawType, Material, RenderObject};
pub use mesh::{Mesh, MeshError, Vertex};
pub use render::{GpuContext, GraphicsContext, HeadlessContext, Renderer};
pub use uniforms::{SharedUniforms, UniformError, UniformSet, UniformValue};
