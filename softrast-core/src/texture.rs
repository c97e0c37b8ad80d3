/// Decoded textures sampled by the textured fill.
use crate::color;
use crate::error::RenderError;

/// A `width` x `height` grid of packed `0xAARRGGBB` texels, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<u32>,
}

impl Texture {
    pub fn new(width: u32, height: u32, texels: Vec<u32>) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        if texels.len() != width as usize * height as usize {
            return Err(RenderError::TextureSize {
                width,
                height,
                actual: texels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Builds a texture from tightly packed RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, RenderError> {
        let texels = bytes
            .chunks_exact(4)
            .map(|px| color::pack(px[0], px[1], px[2], px[3]))
            .collect();
        Self::new(width, height, texels)
    }

    /// Two-color checkerboard with square cells of `cell` texels.
    pub fn checkerboard(width: u32, height: u32, cell: u32, even: u32, odd: u32) -> Self {
        let cell = cell.max(1);
        let width = width.max(1);
        let height = height.max(1);
        let texels = (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| if (x / cell + y / cell) % 2 == 0 { even } else { odd })
            })
            .collect();
        Self {
            width,
            height,
            texels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texels(&self) -> &[u32] {
        &self.texels
    }

    /// Texel at integer coordinates, clamped to the grid.
    #[inline]
    pub fn texel(&self, x: i32, y: i32) -> u32 {
        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        self.texels[y * self.width as usize + x]
    }

    /// Nearest texel for a UV coordinate.
    ///
    /// UVs outside `[0, 1]` clamp to the border, and `u = 1` or `v = 1`
    /// select the last column or row.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let x = (u * self.width as f32).floor();
        let y = (v * self.height as f32).floor();
        // Float to int casts saturate and map NaN to 0.
        self.texel(x as i32, y as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_size() {
        assert!(Texture::new(2, 2, vec![0; 4]).is_ok());
        assert!(matches!(
            Texture::new(2, 2, vec![0; 3]),
            Err(RenderError::TextureSize { actual: 3, .. })
        ));
        assert!(matches!(
            Texture::new(0, 2, vec![]),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_from_rgba8() {
        let texture = Texture::from_rgba8(1, 2, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(texture.texels(), &[0x0401_0203, 0x0805_0607]);
    }

    #[test]
    fn test_sample_clamps_to_border() {
        let texture = Texture::new(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(texture.sample(0.0, 0.0), 1);
        assert_eq!(texture.sample(0.99, 0.0), 2);
        assert_eq!(texture.sample(0.0, 0.99), 3);
        assert_eq!(texture.sample(1.0, 1.0), 4);
        assert_eq!(texture.sample(-3.0, 7.0), 3);
        assert_eq!(texture.sample(f32::NAN, f32::NAN), 1);
    }

    #[test]
    fn test_checkerboard() {
        let texture = Texture::checkerboard(4, 4, 2, color::WHITE, color::BLACK);
        assert_eq!(texture.texel(0, 0), color::WHITE);
        assert_eq!(texture.texel(2, 0), color::BLACK);
        assert_eq!(texture.texel(2, 2), color::WHITE);
        assert_eq!(texture.texel(1, 3), color::BLACK);
    }
}
