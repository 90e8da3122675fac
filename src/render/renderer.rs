use anyhow::{Context, Result};
use log::trace;

use crate::material::RenderObject;

use super::common::{DrawCall, GraphicsContext};

/// Ordered draw list. Every object is drawn every frame in insertion order;
/// no culling, batching or sorting.
#[derive(Debug, Default)]
pub struct Renderer {
    objects: Vec<RenderObject>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an object to the draw list. Duplicates are drawn twice.
    pub fn add_object(&mut self, object: RenderObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[RenderObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Issues one draw call per object. The first failing draw aborts the
    /// frame and its error is returned.
    pub fn render(
        &self,
        gfx: &mut dyn GraphicsContext,
        time: f64,
        delta_time: f64,
    ) -> Result<()> {
        trace!(
            "drawing {} object(s) at t={time:.3}s (dt={delta_time:.4}s)",
            self.objects.len()
        );
        for (index, object) in self.objects.iter().enumerate() {
            let uniforms = object.material.uniforms.read();
            gfx.draw(DrawCall {
                program: object.material.program,
                buffer: object.buffer,
                draw_type: object.draw_type,
                uniforms: &uniforms,
            })
            .with_context(|| format!("draw call for render object {index} failed"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{DrawType, Material};
    use crate::mesh::Mesh;
    use crate::render::{HeadlessContext, ProgramSource};
    use crate::uniforms::{shared, UniformDecl, UniformKind, UniformSet};

    const FLAT: ProgramSource = ProgramSource {
        label: "flat",
        vertex: "",
        fragment: "",
        uniforms: &[UniformDecl::new("u_scale", UniformKind::Float)],
    };

    fn object(gfx: &mut HeadlessContext, scale: f32, draw_type: DrawType) -> RenderObject {
        let program = gfx.create_program(&FLAT).unwrap();
        let buffer = gfx.create_buffer(&Mesh::cube()).unwrap();
        let mut set = UniformSet::new();
        set.set("u_scale", scale);
        RenderObject::new(Material::new(program, shared(set)), buffer, draw_type)
    }

    #[test]
    fn draws_every_object_in_insertion_order() {
        let mut gfx = HeadlessContext::new();
        let mut renderer = Renderer::new();
        let first = object(&mut gfx, 1.0, DrawType::Triangles);
        let second = object(&mut gfx, 2.0, DrawType::Lines);
        let (first_buffer, second_buffer) = (first.buffer, second.buffer);
        renderer.add_object(first);
        renderer.add_object(second);

        renderer.render(&mut gfx, 0.0, 0.016).unwrap();

        let draws = gfx.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].buffer, first_buffer);
        assert_eq!(draws[0].draw_type, DrawType::Triangles);
        assert_eq!(draws[1].buffer, second_buffer);
        assert_eq!(draws[1].draw_type, DrawType::Lines);
    }

    #[test]
    fn duplicates_are_not_filtered() {
        let mut gfx = HeadlessContext::new();
        let mut renderer = Renderer::new();
        let object = object(&mut gfx, 1.0, DrawType::Triangles);
        renderer.add_object(object.clone());
        renderer.add_object(object);
        renderer.render(&mut gfx, 0.0, 0.016).unwrap();
        assert_eq!(gfx.draws().len(), 2);
    }

    #[test]
    fn empty_renderer_draws_nothing() {
        let mut gfx = HeadlessContext::new();
        let renderer = Renderer::new();
        assert!(renderer.is_empty());
        renderer.render(&mut gfx, 0.0, 0.016).unwrap();
        assert!(gfx.draws().is_empty());
    }

    #[test]
    fn draws_read_the_latest_shared_uniforms() {
        let mut gfx = HeadlessContext::new();
        let mut renderer = Renderer::new();
        let object = object(&mut gfx, 1.0, DrawType::Triangles);
        let uniforms = object.material.uniforms.clone();
        renderer.add_object(object);

        uniforms.write().set("u_scale", 4.0f32);
        renderer.render(&mut gfx, 0.0, 0.016).unwrap();

        assert_eq!(
            gfx.draws()[0].uniforms.get("u_scale"),
            Some(&crate::uniforms::UniformValue::Float(4.0))
        );
    }

    #[test]
    fn binding_failure_stops_the_frame() {
        let mut gfx = HeadlessContext::new();
        let mut renderer = Renderer::new();
        let broken = object(&mut gfx, 1.0, DrawType::Triangles);
        broken.material.uniforms.write().set("u_scale", glam::Vec3::ONE);
        renderer.add_object(broken);
        renderer.add_object(object(&mut gfx, 1.0, DrawType::Triangles));

        let err = renderer.render(&mut gfx, 0.0, 0.016).unwrap_err();
        assert!(format!("{err:#}").contains("u_scale"));
        assert!(gfx.draws().is_empty());
    }
}
