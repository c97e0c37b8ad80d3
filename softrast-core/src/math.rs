/// Vector helpers and the 4x4 matrix constructors used by the pipeline.
///
/// Storage and arithmetic (add, sub, scale, dot, cross, products) come from
/// nalgebra. The constructors here pin down the exact matrix layouts the
/// pipeline depends on: a left-handed view space looking down +z, a
/// perspective matrix that carries view-space z into w, and right-handed
/// axis rotations.
use nalgebra::{Matrix4, Vector3, Vector4};

/// Identity matrix.
pub fn identity() -> Matrix4<f32> {
    Matrix4::identity()
}

/// Axis-aligned scale.
pub fn scale(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
    Matrix4::new(
        sx, 0.0, 0.0, 0.0, //
        0.0, sy, 0.0, 0.0, //
        0.0, 0.0, sz, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Translation by `(tx, ty, tz)`.
pub fn translation(tx: f32, ty: f32, tz: f32) -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, tx, //
        0.0, 1.0, 0.0, ty, //
        0.0, 0.0, 1.0, tz, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Rotation about the X axis, counter-clockwise when looking from +X.
pub fn rotation_x(angle: f32) -> Matrix4<f32> {
    let (s, c) = angle.sin_cos();
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, c, -s, 0.0, //
        0.0, s, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Rotation about the Y axis, counter-clockwise when looking from +Y.
pub fn rotation_y(angle: f32) -> Matrix4<f32> {
    let (s, c) = angle.sin_cos();
    Matrix4::new(
        c, 0.0, s, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        -s, 0.0, c, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Rotation about the Z axis, counter-clockwise when looking from +Z.
pub fn rotation_z(angle: f32) -> Matrix4<f32> {
    let (s, c) = angle.sin_cos();
    Matrix4::new(
        c, -s, 0.0, 0.0, //
        s, c, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Perspective projection.
///
/// `fov` is the vertical field of view in radians and `aspect` is
/// height / width. View-space z is remapped so that `znear` lands on 0 and
/// `zfar` on 1 after the divide, and the original z is copied into w.
pub fn perspective(fov: f32, aspect: f32, znear: f32, zfar: f32) -> Matrix4<f32> {
    let f = 1.0 / (fov / 2.0).tan();
    let depth = zfar - znear;
    Matrix4::new(
        aspect * f, 0.0, 0.0, 0.0, //
        0.0, f, 0.0, 0.0, //
        0.0, 0.0, zfar / depth, -zfar * znear / depth, //
        0.0, 0.0, 1.0, 0.0,
    )
}

/// Look-at view matrix.
///
/// The rows are the camera's right, up and forward axes, each with the
/// negated projection of `eye` in the last column, so that `eye` maps to the
/// origin and `target` lands on +z.
pub fn look_at(eye: Vector3<f32>, target: Vector3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    let mut forward = target - eye;
    normalize_in_place(&mut forward);
    let mut right = up.cross(&forward);
    normalize_in_place(&mut right);
    let true_up = forward.cross(&right);

    Matrix4::new(
        right.x, right.y, right.z, -right.dot(&eye), //
        true_up.x, true_up.y, true_up.z, -true_up.dot(&eye), //
        forward.x, forward.y, forward.z, -forward.dot(&eye), //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// `m · v`.
#[inline]
pub fn mul_vec4(m: &Matrix4<f32>, v: Vector4<f32>) -> Vector4<f32> {
    m * v
}

/// `m · v` followed by the perspective divide.
///
/// x, y and z are divided by the resulting w. When w is exactly zero the
/// divide is skipped and the undivided result is returned, so no infinities
/// reach the rasterizer. w itself is kept for perspective-correct
/// interpolation.
pub fn project(m: &Matrix4<f32>, v: Vector4<f32>) -> Vector4<f32> {
    let mut result = m * v;
    if result.w != 0.0 {
        result.x /= result.w;
        result.y /= result.w;
        result.z /= result.w;
    }
    result
}

/// Scales `v` to unit length.
///
/// Precondition: `v` has non-zero length. A zero-length vector is left
/// unchanged instead of being filled with NaN.
#[inline]
pub fn normalize_in_place(v: &mut Vector3<f32>) {
    let length = v.norm();
    if length > 0.0 {
        *v /= length;
    }
}

/// Rotates `v` about the X axis by `angle` radians.
pub fn rotate_x(v: Vector3<f32>, angle: f32) -> Vector3<f32> {
    let (s, c) = angle.sin_cos();
    Vector3::new(v.x, v.y * c - v.z * s, v.y * s + v.z * c)
}

/// Rotates `v` about the Y axis by `angle` radians.
pub fn rotate_y(v: Vector3<f32>, angle: f32) -> Vector3<f32> {
    let (s, c) = angle.sin_cos();
    Vector3::new(v.x * c + v.z * s, v.y, -v.x * s + v.z * c)
}

/// Rotates `v` about the Z axis by `angle` radians.
pub fn rotate_z(v: Vector3<f32>, angle: f32) -> Vector3<f32> {
    let (s, c) = angle.sin_cos();
    Vector3::new(v.x * c - v.y * s, v.x * s + v.y * c, v.z)
}

/// Homogeneous point with w = 1.
#[inline]
pub fn vec4_from_vec3(v: Vector3<f32>) -> Vector4<f32> {
    Vector4::new(v.x, v.y, v.z, 1.0)
}

/// Drops w without dividing.
#[inline]
pub fn vec3_from_vec4(v: Vector4<f32>) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_relative_eq, relative_eq};
    use std::f32::consts::{FRAC_PI_2, PI};

    const ANGLES: [f32; 7] = [0.0, 0.3, -0.7, 1.0, FRAC_PI_2, PI, 5.9];

    #[test]
    fn test_identity_preserves_vectors() {
        let samples = [
            Vector4::new(0.0, 0.0, 0.0, 1.0),
            Vector4::new(1.5, -2.0, 3.25, 1.0),
            Vector4::new(-100.0, 42.0, 0.001, 0.0),
        ];
        for v in samples {
            assert_eq!(mul_vec4(&identity(), v), v);
        }
    }

    #[test]
    fn test_rotations_are_orthogonal() {
        for angle in ANGLES {
            for r in [rotation_x(angle), rotation_y(angle), rotation_z(angle)] {
                assert!(relative_eq!(r.transpose() * r, Matrix4::identity(), epsilon = 1e-5));
                assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_rotations_are_counter_clockwise() {
        // Looking down from +Z, +X turns towards +Y.
        let v = rotation_z(FRAC_PI_2) * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(v, Vector4::new(0.0, 1.0, 0.0, 1.0), epsilon = 1e-6);
        // Looking down from +X, +Y turns towards +Z.
        let v = rotation_x(FRAC_PI_2) * Vector4::new(0.0, 1.0, 0.0, 1.0);
        assert_relative_eq!(v, Vector4::new(0.0, 0.0, 1.0, 1.0), epsilon = 1e-6);
        // Looking down from +Y, +Z turns towards +X.
        let v = rotation_y(FRAC_PI_2) * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert_relative_eq!(v, Vector4::new(1.0, 0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_vector_rotation_matches_matrices() {
        let v = Vector3::new(0.4, -1.2, 2.5);
        for angle in ANGLES {
            assert_relative_eq!(
                rotate_x(v, angle),
                vec3_from_vec4(rotation_x(angle) * vec4_from_vec3(v)),
                epsilon = 1e-5
            );
            assert_relative_eq!(
                rotate_y(v, angle),
                vec3_from_vec4(rotation_y(angle) * vec4_from_vec3(v)),
                epsilon = 1e-5
            );
            assert_relative_eq!(
                rotate_z(v, angle),
                vec3_from_vec4(rotation_z(angle) * vec4_from_vec3(v)),
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn test_matrix_product_order_matters() {
        let t = translation(1.0, 0.0, 0.0);
        let r = rotation_z(FRAC_PI_2);
        let p = vec4_from_vec3(Vector3::new(1.0, 0.0, 0.0));
        // Rotate then translate vs translate then rotate.
        assert_relative_eq!(t * r * p, Vector4::new(1.0, 1.0, 0.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(r * t * p, Vector4::new(0.0, 2.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_scale_and_translation() {
        let p = vec4_from_vec3(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(scale(2.0, 3.0, 4.0) * p, Vector4::new(2.0, 6.0, 12.0, 1.0));
        assert_eq!(translation(1.0, -1.0, 5.0) * p, Vector4::new(2.0, 1.0, 8.0, 1.0));
    }

    #[test]
    fn test_perspective_near_and_far_planes() {
        let (znear, zfar) = (0.1, 100.0);
        let m = perspective(PI / 3.0, 0.75, znear, zfar);

        let near = project(&m, Vector4::new(0.0, 0.0, znear, 1.0));
        assert_relative_eq!(near.x, 0.0);
        assert_relative_eq!(near.y, 0.0);
        assert_relative_eq!(near.z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(near.w, znear);

        let far = project(&m, Vector4::new(0.0, 0.0, zfar, 1.0));
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-5);
        assert_relative_eq!(far.w, zfar);
    }

    #[test]
    fn test_perspective_bounds_points_inside_frustum() {
        let fov = FRAC_PI_2;
        let m = perspective(fov, 1.0, 0.1, 100.0);
        // The top edge of the frustum at the near plane.
        let half_height = 0.1 * (fov / 2.0).tan();
        let edge = project(&m, Vector4::new(half_height, half_height, 0.1, 1.0));
        assert_relative_eq!(edge.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(edge.y, 1.0, epsilon = 1e-5);
        for z in [0.5, 1.0, 10.0, 99.0] {
            let p = project(&m, Vector4::new(0.3 * z, -0.2 * z, z, 1.0));
            assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0);
            assert!((0.0..=1.0).contains(&p.z));
        }
    }

    #[test]
    fn test_project_skips_divide_when_w_is_zero() {
        // A point at view-space z = 0 gets w = 0 from the perspective matrix.
        let m = perspective(FRAC_PI_2, 1.0, 0.1, 100.0);
        let p = project(&m, Vector4::new(2.0, 3.0, 0.0, 1.0));
        assert_eq!(p.w, 0.0);
        assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
        assert_relative_eq!(p.x, 2.0);
        assert_relative_eq!(p.y, 3.0);
    }

    #[test]
    fn test_normalize_in_place() {
        let mut v = Vector3::new(3.0, 0.0, 4.0);
        normalize_in_place(&mut v);
        assert_relative_eq!(v, Vector3::new(0.6, 0.0, 0.8));

        let mut zero = Vector3::zeros();
        normalize_in_place(&mut zero);
        assert_eq!(zero, Vector3::zeros());
    }

    #[test]
    fn test_look_at_from_origin_is_identity() {
        let view = look_at(Vector3::zeros(), Vector3::new(0.0, 0.0, 1.0), Vector3::y());
        assert_relative_eq!(view, Matrix4::identity(), epsilon = 1e-6);
    }

    #[test]
    fn test_look_at_moves_target_onto_positive_z() {
        let eye = Vector3::new(3.0, 2.0, -4.0);
        let target = Vector3::new(0.0, 0.0, 5.0);
        let view = look_at(eye, target, Vector3::y());

        let eye_view = view * vec4_from_vec3(eye);
        assert_relative_eq!(eye_view, Vector4::new(0.0, 0.0, 0.0, 1.0), epsilon = 1e-5);

        let target_view = view * vec4_from_vec3(target);
        let distance = (target - eye).norm();
        assert_relative_eq!(target_view.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(target_view.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(target_view.z, distance, epsilon = 1e-4);
    }
}
