//! 4x4 matrix helpers with the conventions the scene is written against:
//! column vectors, right-handed world, GL clip space (depth in -w..w).
//!
//! `look_at` returns the camera's world matrix, not a view matrix. The view
//! matrix is its inverse.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// GL-style perspective projection. `fov_y` is the vertical field of view in
/// radians.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov_y, aspect, near, far)
}

/// World matrix of a camera at `eye` looking at `target`.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let z_axis = (eye - target).normalize();
    let x_axis = up.cross(z_axis).normalize();
    let y_axis = z_axis.cross(x_axis).normalize();
    Mat4::from_cols(
        x_axis.extend(0.0),
        y_axis.extend(0.0),
        z_axis.extend(0.0),
        eye.extend(1.0),
    )
}

pub fn rotation_y(angle: f32) -> Mat4 {
    Mat4::from_rotation_y(angle)
}

pub fn inverse(m: Mat4) -> Mat4 {
    m.inverse()
}

pub fn transpose(m: Mat4) -> Mat4 {
    m.transpose()
}

pub fn multiply(a: Mat4, b: Mat4) -> Mat4 {
    a * b
}

/// Matrix that carries normals into world space alongside `world`.
pub fn normal_matrix(world: Mat4) -> Mat4 {
    transpose(inverse(world))
}

/// Instantaneous frame rate, `round(1 / delta_time)`.
///
/// There is no smoothing and no guard: a zero delta yields `inf`.
pub fn frame_rate(delta_time: f64) -> f64 {
    (1.0 / delta_time).round()
}

/// Per-frame camera matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub projection: Mat4,
    /// Camera world matrix (the view inverse).
    pub camera: Mat4,
    pub view: Mat4,
    pub view_projection: Mat4,
}

impl CameraMatrices {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let projection = perspective(
            config.fov_degrees.to_radians(),
            aspect,
            config.near,
            config.far,
        );
        let camera = look_at(config.eye, config.target, config.up);
        let view = inverse(camera);
        Self {
            projection,
            camera,
            view,
            view_projection: multiply(projection, view),
        }
    }

    /// Position of the eye, read back from the camera matrix.
    pub fn eye(&self) -> Vec3 {
        self.camera.w_axis.truncate()
    }
}
