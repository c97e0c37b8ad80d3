/// Scan-line rasterization into a [`FrameBuffer`].
///
/// Triangles are split at their middle vertex into a flat-bottom and a
/// flat-top half, and each half is walked one row at a time between its two
/// bounding edges. The flat and textured fills share that walk so they
/// cover exactly the same pixels.
use nalgebra::{Vector2, Vector3};

use crate::color;
use crate::framebuffer::FrameBuffer;
use crate::texture::Texture;
use crate::triangle::Triangle;

/// Side length of the square drawn on each vertex.
const VERTEX_MARKER_SIZE: i32 = 6;

/// Snaps a screen position to the pixel grid. Stays in f64 so corners far
/// off screen keep the exact direction of their edges.
#[inline]
fn snap(p: Vector2<f32>) -> (f64, f64) {
    (f64::from(p.x).floor(), f64::from(p.y).floor())
}

fn is_finite(p: &Vector2<f32>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Parameter range `t0..=t1` of the segment `p + t * d`, `t` in `[0, 1]`,
/// that lies inside `min..=max` on both axes (Liang-Barsky).
fn clip_segment(
    p: (f64, f64),
    d: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<(f64, f64)> {
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let boundaries = [
        (-d.0, p.0 - min.0),
        (d.0, max.0 - p.0),
        (-d.1, p.1 - min.1),
        (d.1, max.1 - p.1),
    ];
    for (step, distance) in boundaries {
        if step == 0.0 {
            // Parallel to this boundary.
            if distance < 0.0 {
                return None;
            }
            continue;
        }
        let t = distance / step;
        if step < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }
    Some((t0, t1))
}

/// Draws a line with a fixed-step DDA.
///
/// Steps once per pixel along the axis of greater extent, so every pixel on
/// the segment is written exactly once whatever the slope's sign. Both
/// endpoints are included. The segment is clipped to the buffer first, so
/// the work is bounded by the buffer size.
pub fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    draw_segment(
        fb,
        (f64::from(x0), f64::from(y0)),
        (f64::from(x1), f64::from(y1)),
        color,
    );
}

fn draw_segment(fb: &mut FrameBuffer, from: (f64, f64), to: (f64, f64), color: u32) {
    // Pixel centers round to the buffer within half a pixel of its edge.
    let min = (-0.5, -0.5);
    let max = (f64::from(fb.width()) - 0.5, f64::from(fb.height()) - 0.5);
    let d = (to.0 - from.0, to.1 - from.1);
    let Some((t0, t1)) = clip_segment(from, d, min, max) else {
        return;
    };

    let (x0, y0) = if t0 > 0.0 {
        ((from.0 + d.0 * t0).round(), (from.1 + d.1 * t0).round())
    } else {
        from
    };
    let (x1, y1) = if t1 < 1.0 {
        ((from.0 + d.0 * t1).round(), (from.1 + d.1 * t1).round())
    } else {
        to
    };

    let (dx, dy) = (x1 - x0, y1 - y0);
    let steps = dx.abs().max(dy.abs());
    if steps == 0.0 {
        fb.set_pixel(x0 as i32, y0 as i32, color);
        return;
    }

    let x_increment = dx / steps;
    let y_increment = dy / steps;
    for step in 0..=steps as i64 {
        let x = x0 + x_increment * step as f64;
        let y = y0 + y_increment * step as f64;
        fb.set_pixel(x.round() as i32, y.round() as i32, color);
    }
}

/// Outlines a triangle.
pub fn draw_wireframe(fb: &mut FrameBuffer, triangle: &Triangle, color: u32) {
    let points = triangle.screen_points();
    if !points.iter().all(is_finite) {
        return;
    }
    let [a, b, c] = points.map(snap);
    draw_segment(fb, a, b, color);
    draw_segment(fb, b, c, color);
    draw_segment(fb, c, a, color);
}

/// Draws a small square centered on each corner.
pub fn draw_vertices(fb: &mut FrameBuffer, triangle: &Triangle, color: u32) {
    let half = VERTEX_MARKER_SIZE / 2;
    let reach = f64::from(half);
    for p in triangle.screen_points().iter().filter(|p| is_finite(p)) {
        let (x, y) = snap(*p);
        let (right, bottom) = (f64::from(fb.width()) + reach, f64::from(fb.height()) + reach);
        if x < -reach || y < -reach || x > right || y > bottom {
            continue;
        }
        let (x, y) = (x as i32, y as i32);
        fb.draw_rect(x - half, y - half, VERTEX_MARKER_SIZE, VERTEX_MARKER_SIZE, color);
    }
}

/// Fills a triangle with its lit color.
pub fn fill_triangle(fb: &mut FrameBuffer, triangle: &Triangle) {
    let (width, height) = (fb.width(), fb.height());
    let color = triangle.color;
    scan_triangle(triangle.screen_points(), width, height, &mut |y, x_start, x_end| {
        fb.fill_span(y, x_start, x_end, color);
    });
}

/// Fills a triangle with perspective-correct texture samples.
///
/// Texels are tinted by the triangle's light intensity, the same factor the
/// flat fill bakes into its color.
pub fn fill_textured_triangle(fb: &mut FrameBuffer, triangle: &Triangle, texture: &Texture) {
    let (width, height) = (fb.width(), fb.height());
    scan_triangle(triangle.screen_points(), width, height, &mut |y, x_start, x_end| {
        let first = x_start.min(x_end).max(0);
        let last = x_start.max(x_end).min(width as i32 - 1);
        for x in first..=last {
            if let Some(uv) = perspective_uv(triangle, Vector2::new(x as f32, y as f32)) {
                let texel = texture.sample(uv.x, uv.y);
                fb.set_pixel(x, y, color::apply_intensity(texel, triangle.intensity));
            }
        }
    });
}

#[inline]
fn cross2(u: (f64, f64), v: (f64, f64)) -> f64 {
    u.0 * v.1 - u.1 * v.0
}

/// Barycentric weights of `p` with respect to `a`, `b` and `c`.
///
/// Returns `None` for a triangle with zero area. Weights are not clamped:
/// points outside the triangle get a negative weight. Computed in f64 so
/// corners projected far off screen stay accurate.
pub fn barycentric_weights(
    a: Vector2<f32>,
    b: Vector2<f32>,
    c: Vector2<f32>,
    p: Vector2<f32>,
) -> Option<Vector3<f32>> {
    let [a, b, c, p] = [a, b, c, p].map(|v| (f64::from(v.x), f64::from(v.y)));
    let sub = |u: (f64, f64), v: (f64, f64)| (u.0 - v.0, u.1 - v.1);
    let ab = sub(b, a);
    let ac = sub(c, a);
    let area = cross2(ac, ab);
    if area == 0.0 {
        return None;
    }

    let alpha = cross2(sub(c, p), sub(b, p)) / area;
    let beta = cross2(ac, sub(p, a)) / area;
    let gamma = 1.0 - alpha - beta;
    Some(Vector3::new(alpha as f32, beta as f32, gamma as f32))
}

/// Texture coordinate at screen position `p`, interpolated in `1/w`.
///
/// `u/w`, `v/w` and `1/w` are interpolated linearly in screen space and the
/// first two are divided by the third. If a corner has `w = 0` the
/// interpolation falls back to affine. `None` for degenerate triangles.
pub fn perspective_uv(triangle: &Triangle, p: Vector2<f32>) -> Option<Vector2<f32>> {
    let [a, b, c] = triangle.screen_points();
    let weights = barycentric_weights(a, b, c, p)?;

    let mut reciprocal = triangle.points.map(|point| 1.0 / point.w);
    if reciprocal.iter().any(|r| !r.is_finite()) {
        reciprocal = [1.0; 3];
    }

    let mut one_over_w = 0.0;
    let mut uv_over_w = Vector2::zeros();
    for i in 0..3 {
        let weight = weights[i] * reciprocal[i];
        one_over_w += weight;
        uv_over_w += triangle.texcoords[i] * weight;
    }
    if one_over_w == 0.0 || !one_over_w.is_finite() {
        return None;
    }
    Some(uv_over_w / one_over_w)
}

/// Calls `span(y, x_start, x_end)` for every visible row the triangle
/// covers. `x_start` may exceed `x_end`; both are clipped to one pixel
/// outside the buffer. Corners that are not finite skip the triangle.
fn scan_triangle(
    points: [Vector2<f32>; 3],
    width: u32,
    height: u32,
    span: &mut impl FnMut(i32, i32, i32),
) {
    if !points.iter().all(is_finite) {
        return;
    }
    let mut p = points.map(snap);
    p.sort_by(|a, b| a.1.total_cmp(&b.1));
    let [(x0, y0), (x1, y1), (x2, y2)] = p;
    let mut emit = |row: i32, x_start: f64, x_end: f64| {
        span(row, span_x(x_start, width), span_x(x_end, width));
    };

    if y0 == y2 {
        // Degenerate: all three corners on one row.
        for row in visible_rows(y0, y0, height) {
            emit(row, x0.min(x1).min(x2), x0.max(x1).max(x2));
        }
    } else if y1 == y2 {
        scan_flat_bottom((x0, y0), x1, x2, y1, height, &mut emit);
    } else if y0 == y1 {
        scan_flat_top(x0, x1, y0, (x2, y2), height, &mut emit);
    } else {
        // Point on the long edge at the middle vertex's row.
        let mx = x0 + ((x2 - x0) * (y1 - y0) / (y2 - y0)).round();
        scan_flat_bottom((x0, y0), x1, mx, y1, height, &mut emit);
        scan_flat_top(x1, mx, y1, (x2, y2), height, &mut emit);
    }
}

/// Span end clipped to `-1..=width`, which keeps its side of the buffer.
#[inline]
fn span_x(x: f64, width: u32) -> i32 {
    x.clamp(-1.0, f64::from(width)) as i32
}

/// Rows from `top` down to the horizontal edge `left..right` at `y`.
fn scan_flat_bottom(
    top: (f64, f64),
    left: f64,
    right: f64,
    y: f64,
    height: u32,
    span: &mut impl FnMut(i32, f64, f64),
) {
    let rows = y - top.1;
    let inv_slope_1 = (left - top.0) / rows;
    let inv_slope_2 = (right - top.0) / rows;
    for row in visible_rows(top.1, y, height) {
        let t = f64::from(row) - top.1;
        span(
            row,
            top.0 + (t * inv_slope_1).round(),
            top.0 + (t * inv_slope_2).round(),
        );
    }
}

/// Rows from the horizontal edge `left..right` at `y` down to `bottom`.
fn scan_flat_top(
    left: f64,
    right: f64,
    y: f64,
    bottom: (f64, f64),
    height: u32,
    span: &mut impl FnMut(i32, f64, f64),
) {
    let rows = bottom.1 - y;
    let inv_slope_1 = (bottom.0 - left) / rows;
    let inv_slope_2 = (bottom.0 - right) / rows;
    for row in visible_rows(y, bottom.1, height) {
        let t = f64::from(row) - y;
        span(
            row,
            left + (t * inv_slope_1).round(),
            right + (t * inv_slope_2).round(),
        );
    }
}

/// Rows of `y_start..=y_end` inside the buffer.
fn visible_rows(y_start: f64, y_end: f64, height: u32) -> std::ops::RangeInclusive<i32> {
    let first = y_start.max(0.0);
    let last = y_end.min(f64::from(height) - 1.0);
    if first > last {
        return 1..=0;
    }
    first as i32..=last as i32
}
