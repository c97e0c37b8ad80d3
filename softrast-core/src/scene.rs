/// Camera, light and the per-frame view of everything the renderer reads.
use nalgebra::{Matrix4, Vector3};

use crate::geometry::Mesh;
use crate::math;
use crate::texture::Texture;

/// First-person camera.
///
/// `direction` is the unrotated facing; the effective facing is `direction`
/// turned by `yaw` about the world Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3<f32>,
    pub direction: Vector3<f32>,
    pub forward_velocity: Vector3<f32>,
    pub yaw: f32,
}

impl Camera {
    pub fn new(position: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            position,
            direction,
            forward_velocity: Vector3::zeros(),
            yaw: 0.0,
        }
    }

    /// A camera at `position` facing `target`.
    pub fn looking_at(position: Vector3<f32>, target: Vector3<f32>) -> Self {
        let mut direction = target - position;
        math::normalize_in_place(&mut direction);
        Self::new(position, direction)
    }

    /// The facing after applying yaw.
    pub fn facing(&self) -> Vector3<f32> {
        math::rotate_y(self.direction, self.yaw)
    }

    pub fn target(&self) -> Vector3<f32> {
        self.position + self.facing()
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        math::look_at(self.position, self.target(), Vector3::y())
    }

    /// Moves along the current facing; negative distances move backwards.
    pub fn move_forward(&mut self, distance: f32) {
        self.forward_velocity = self.facing() * distance;
        self.position += self.forward_velocity;
    }

    pub fn turn(&mut self, delta_yaw: f32) {
        self.yaw += delta_yaw;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 1.0))
    }
}

/// A single directional light.
///
/// The direction is expressed in view space, the space face normals are
/// computed in, so the light stays fixed relative to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub direction: Vector3<f32>,
}

impl Light {
    pub fn new(direction: Vector3<f32>) -> Self {
        let mut direction = direction;
        math::normalize_in_place(&mut direction);
        Self { direction }
    }

    /// Brightness factor for a surface with unit `normal`.
    ///
    /// Positive when the surface faces into the light, negative when it
    /// faces away. Callers clamp when applying it to a color.
    #[inline]
    pub fn intensity(&self, normal: &Vector3<f32>) -> f32 {
        -normal.dot(&self.direction)
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vector3::new(0.0, 0.0, 1.0))
    }
}

/// Everything one frame borrows from the application.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub mesh: &'a Mesh,
    pub camera: &'a Camera,
    pub light: &'a Light,
    pub texture: Option<&'a Texture>,
}

impl<'a> Scene<'a> {
    pub fn new(mesh: &'a Mesh, camera: &'a Camera, light: &'a Light) -> Self {
        Self {
            mesh,
            camera,
            light,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: &'a Texture) -> Self {
        self.texture = Some(texture);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector4;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_camera_view_is_identity() {
        let camera = Camera::default();
        assert_relative_eq!(camera.view_matrix(), Matrix4::identity(), epsilon = 1e-6);
    }

    #[test]
    fn test_looking_at_centers_target() {
        let target = Vector3::new(0.0, 0.0, 5.0);
        let camera = Camera::looking_at(Vector3::new(2.0, 1.0, 0.0), target);
        let p = camera.view_matrix() * math::vec4_from_vec3(target);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert!(p.z > 0.0);
    }

    #[test]
    fn test_turn_and_move() {
        let mut camera = Camera::default();
        camera.turn(FRAC_PI_2);
        assert_relative_eq!(camera.facing(), Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-6);

        camera.move_forward(2.0);
        assert_relative_eq!(camera.position, Vector3::new(2.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(camera.forward_velocity, Vector3::new(2.0, 0.0, 0.0), epsilon = 1e-6);

        // A point ahead of the turned camera sits on +z in view space.
        let ahead = camera.view_matrix() * Vector4::new(5.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(ahead, Vector4::new(0.0, 0.0, 3.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_light_intensity_sign() {
        let light = Light::new(Vector3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(light.direction, Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(light.intensity(&Vector3::new(0.0, 0.0, -1.0)), 1.0);
        assert_relative_eq!(light.intensity(&Vector3::new(0.0, 0.0, 1.0)), -1.0);
        assert_relative_eq!(light.intensity(&Vector3::new(1.0, 0.0, 0.0)), 0.0);
    }
}
