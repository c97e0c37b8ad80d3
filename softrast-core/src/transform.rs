/// Mesh placement and the per-vertex world/view transform chain.
use nalgebra::{Matrix4, Vector3, Vector4};

use crate::geometry::{Face, Mesh};
use crate::math;

/// Rotation (radians), scale and translation of a mesh in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshTransform {
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub translation: Vector3<f32>,
}

impl MeshTransform {
    pub fn new(rotation: Vector3<f32>, scale: Vector3<f32>, translation: Vector3<f32>) -> Self {
        Self {
            rotation,
            scale,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self {
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            translation: Vector3::zeros(),
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation += Vector3::new(dx, dy, dz);
    }

    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.translation += Vector3::new(dx, dy, dz);
    }

    /// World matrix `Translate · RotateX · RotateY · RotateZ · Scale`.
    ///
    /// Applied to a vertex this scales first, then rotates about Z, Y and X,
    /// then translates.
    pub fn world_matrix(&self) -> Matrix4<f32> {
        let scale = math::scale(self.scale.x, self.scale.y, self.scale.z);
        let rotation_x = math::rotation_x(self.rotation.x);
        let rotation_y = math::rotation_y(self.rotation.y);
        let rotation_z = math::rotation_z(self.rotation.z);
        let translation =
            math::translation(self.translation.x, self.translation.y, self.translation.z);

        translation * rotation_x * rotation_y * rotation_z * scale
    }
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// `view · world`, built once per mesh per frame.
pub fn model_view(world: &Matrix4<f32>, view: &Matrix4<f32>) -> Matrix4<f32> {
    view * world
}

/// Transforms the three corners of `face` into view space.
///
/// `model_view` is the product returned by [`model_view`]; the result keeps
/// the face's winding order and w = 1.
pub fn transform_face(mesh: &Mesh, face: &Face, model_view: &Matrix4<f32>) -> [Vector4<f32>; 3] {
    mesh.face_vertices(face)
        .map(|vertex| math::mul_vec4(model_view, math::vec4_from_vec3(vertex)))
}
