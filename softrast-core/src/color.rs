/// Packed pixel format shared by faces, textures and the frame buffer.
///
/// Every color is a `u32` laid out as `0xAARRGGBB`.

pub const BLACK: u32 = 0xFF00_0000;
pub const WHITE: u32 = 0xFFFF_FFFF;
pub const RED: u32 = 0xFFFF_0000;
pub const GRID: u32 = 0xFF44_4444;

/// Packs 8-bit channels into `0xAARRGGBB`.
#[inline]
pub const fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Splits `0xAARRGGBB` into `[r, g, b, a]`.
#[inline]
pub const fn unpack(color: u32) -> [u8; 4] {
    [
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
        (color >> 24) as u8,
    ]
}

/// Scales the RGB channels of `color` by `factor`, keeping alpha.
///
/// `factor` is clamped to `[0, 1]`, so a channel never exceeds its original
/// value and never goes below zero.
pub fn apply_intensity(color: u32, factor: f32) -> u32 {
    let factor = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
    let [r, g, b, a] = unpack(color);
    let scale = |channel: u8| (f32::from(channel) * factor) as u8;
    pack(scale(r), scale(g), scale(b), a)
}
