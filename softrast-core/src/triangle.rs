/// Screen-space triangles handed from the pipeline to the rasterizer.
use nalgebra::{Vector2, Vector4};

/// A projected, lit triangle ready to rasterize.
///
/// Triangles live for a single frame. Each point holds pixel x and y, NDC
/// depth in z and view-space depth in w.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub points: [Vector4<f32>; 3],
    pub texcoords: [Vector2<f32>; 3],
    /// Base color with lighting applied.
    pub color: u32,
    /// Clamped light factor, reused to tint texels.
    pub intensity: f32,
    /// Mean view-space depth of the three corners.
    pub avg_depth: f32,
}

impl Triangle {
    /// The three points as 2D pixel coordinates.
    #[inline]
    pub fn screen_points(&self) -> [Vector2<f32>; 3] {
        self.points.map(|p| Vector2::new(p.x, p.y))
    }
}
