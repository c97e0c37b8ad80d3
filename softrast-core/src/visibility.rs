/// Backface culling and painter's-algorithm ordering.
///
/// There is no depth buffer: triangles are painted farthest first so nearer
/// ones overwrite them. Interpenetrating triangles therefore draw in
/// whichever order their average depths dictate.
use nalgebra::{Vector3, Vector4};
use serde::{Deserialize, Serialize};

use crate::math;
use crate::triangle::Triangle;

/// Whether faces looking away from the camera are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullMode {
    None,
    #[default]
    Backface,
}

/// Unit normal of a view-space triangle.
///
/// Computed as `normalize(normalize(B - A) x normalize(C - A))`. With the
/// clockwise-front winding used by the meshes, front faces get a normal
/// pointing towards the camera. Degenerate triangles yield a zero normal.
pub fn face_normal(vertices: &[Vector3<f32>; 3]) -> Vector3<f32> {
    let [a, b, c] = *vertices;
    let mut ab = b - a;
    let mut ac = c - a;
    math::normalize_in_place(&mut ab);
    math::normalize_in_place(&mut ac);

    let mut normal = ab.cross(&ac);
    math::normalize_in_place(&mut normal);
    normal
}

/// Whether a face with `normal` and first corner `a` faces `camera`.
///
/// In view space the camera sits at the origin. Faces exactly edge-on are
/// treated as facing.
#[inline]
pub fn is_front_facing(normal: &Vector3<f32>, a: &Vector3<f32>, camera: &Vector3<f32>) -> bool {
    let camera_ray = camera - a;
    normal.dot(&camera_ray) >= 0.0
}

/// Whether a face survives `cull` given its normal and first corner.
pub fn is_visible(cull: CullMode, normal: &Vector3<f32>, a: &Vector3<f32>) -> bool {
    match cull {
        CullMode::None => true,
        CullMode::Backface => is_front_facing(normal, a, &Vector3::zeros()),
    }
}

/// Mean view-space z of the three corners, taken before projection.
#[inline]
pub fn average_depth(vertices: &[Vector4<f32>; 3]) -> f32 {
    (vertices[0].z + vertices[1].z + vertices[2].z) / 3.0
}

/// Orders triangles farthest first.
///
/// Ties keep no particular order.
pub fn sort_back_to_front(triangles: &mut [Triangle]) {
    triangles.sort_unstable_by(|a, b| b.avg_depth.total_cmp(&a.avg_depth));
}
