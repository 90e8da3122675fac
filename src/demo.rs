//! The spinning textured cube.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::app::{Overlay, Scene};
use crate::config::SceneConfig;
use crate::material::{DrawType, Material, RenderObject};
use crate::math::{frame_rate, multiply, normal_matrix, rotation_y, CameraMatrices};
use crate::mesh::Mesh;
use crate::render::{
    Capability, ClearFlags, Filter, GraphicsContext, Renderer, TextureDesc, PHONG,
};
use crate::uniforms::{self, SharedUniforms, UniformSet};

/// 2x2 RGBA checkerboard: white, light grey / light grey, white.
const CHECKERBOARD: [u8; 16] = [
    255, 255, 255, 255, 192, 192, 192, 255, //
    192, 192, 192, 255, 255, 255, 255, 255,
];

/// A single cube rotating about the world Y axis at one radian per second,
/// lit by one point light.
#[derive(Debug)]
pub struct CubeScene {
    config: SceneConfig,
    uniforms: SharedUniforms,
    renderer: Renderer,
}

impl CubeScene {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            uniforms: uniforms::shared(UniformSet::new()),
            renderer: Renderer::new(),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The uniform set shared with the cube's material.
    pub fn uniforms(&self) -> &SharedUniforms {
        &self.uniforms
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}

impl Default for CubeScene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Scene for CubeScene {
    fn init(&mut self, gfx: &mut dyn GraphicsContext) -> Result<()> {
        let texture = gfx
            .create_texture(&TextureDesc {
                width: 2,
                height: 2,
                pixels: &CHECKERBOARD,
                min: Filter::Nearest,
                mag: Filter::Nearest,
            })
            .context("failed to create checkerboard texture")?;

        {
            let light = &self.config.light;
            let material = &self.config.material;
            let mut uniforms = self.uniforms.write();
            uniforms.set("u_lightWorldPos", light.position);
            uniforms.set("u_lightColor", light.color);
            uniforms.set("u_ambient", material.ambient);
            uniforms.set("u_specular", material.specular);
            uniforms.set("u_shininess", material.shininess);
            uniforms.set("u_specularFactor", material.specular_factor);
            uniforms.set("u_diffuse", texture);
        }

        let program = gfx
            .create_program(&PHONG)
            .context("failed to create phong program")?;
        let buffer = gfx
            .create_buffer(&Mesh::cube())
            .context("failed to upload cube buffers")?;

        self.renderer.add_object(RenderObject::new(
            Material::new(program, Arc::clone(&self.uniforms)),
            buffer,
            DrawType::Triangles,
        ));

        info!("Game Inited.");
        debug!("{:?}", self.renderer);
        Ok(())
    }

    fn update(&mut self, _time: f64, delta_time: f64, overlay: &mut dyn Overlay) -> Result<()> {
        overlay.set_label(
            &self.config.fps_label,
            &format!("{} fps", frame_rate(delta_time)),
        )
    }

    fn render(
        &mut self,
        gfx: &mut dyn GraphicsContext,
        time: f64,
        delta_time: f64,
    ) -> Result<()> {
        gfx.resize_to_display_size();
        let (width, height) = gfx.drawing_buffer_size();
        gfx.set_viewport(0, 0, width, height);
        gfx.set_clear_color(self.config.clear_color);
        gfx.enable(Capability::DepthTest);
        gfx.enable(Capability::CullFace);
        gfx.clear(ClearFlags::ALL);

        let (display_width, display_height) = gfx.display_size();
        let aspect = display_width as f32 / display_height as f32;
        let camera = CameraMatrices::new(&self.config.camera, aspect);
        let world = rotation_y(time as f32);

        {
            let mut uniforms = self.uniforms.write();
            uniforms.set("u_viewInverse", camera.camera);
            uniforms.set("u_world", world);
            uniforms.set("u_worldInverseTranspose", normal_matrix(world));
            uniforms.set(
                "u_worldViewProjection",
                multiply(camera.view_projection, world),
            );
        }

        self.renderer.render(gfx, time, delta_time)
    }
}
