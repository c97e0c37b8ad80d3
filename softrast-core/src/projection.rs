/// Perspective projection parameters and the NDC to screen mapping.
use nalgebra::{Matrix4, Vector4};

use crate::math;

/// Perspective frustum for a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Height divided by width.
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fov: f32, znear: f32, zfar: f32) -> Self {
        Self {
            fov,
            aspect: aspect_ratio(width, height),
            znear,
            zfar,
        }
    }

    /// Recomputes the aspect ratio after a viewport change.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Create the projection matrix
    pub fn matrix(&self) -> Matrix4<f32> {
        math::perspective(self.fov, self.aspect, self.znear, self.zfar)
    }

    /// Projects a view-space vertex to screen space.
    ///
    /// The result holds pixel x and y, NDC depth in z and the view-space
    /// depth in w.
    pub fn project_to_screen(
        &self,
        matrix: &Matrix4<f32>,
        vertex: Vector4<f32>,
        width: u32,
        height: u32,
    ) -> Vector4<f32> {
        viewport(math::project(matrix, vertex), width, height)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(800, 600, std::f32::consts::PI / 3.0, 0.1, 100.0)
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    if width == 0 {
        1.0
    } else {
        height as f32 / width as f32
    }
}

/// Maps NDC x and y onto a `width` x `height` pixel grid.
///
/// Screen y grows downward, so NDC y is inverted; the NDC origin lands on
/// the center of the screen.
pub fn viewport(ndc: Vector4<f32>, width: u32, height: u32) -> Vector4<f32> {
    let half_width = width as f32 / 2.0;
    let half_height = height as f32 / 2.0;
    Vector4::new(
        ndc.x * half_width + half_width,
        -ndc.y * half_height + half_height,
        ndc.z,
        ndc.w,
    )
}
