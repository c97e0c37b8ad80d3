/// The pixel array the rasterizer paints into.
use crate::color;
use crate::error::RenderError;

/// A `width` x `height` grid of packed `0xAARRGGBB` pixels, row-major.
///
/// Every write is bounds checked per pixel, so callers may hand it
/// coordinates that fall off screen.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Ok(Self {
            pixels: allocate_pixels(width, height)?,
            width,
            height,
        })
    }

    /// Reallocates for new dimensions; contents are cleared to black.
    ///
    /// On failure the buffer is left as it was.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.pixels = allocate_pixels(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Writes one pixel; coordinates off the buffer are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = color;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    /// Fills the inclusive span `x0..=x1` of row `y`, clipped to the buffer.
    pub fn fill_span(&mut self, y: i32, x0: i32, x1: i32, color: u32) {
        if y < 0 || y as u32 >= self.height || self.width == 0 {
            return;
        }
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let x0 = x0.max(0);
        let x1 = x1.min(self.width as i32 - 1);
        if x0 > x1 {
            return;
        }
        let row = y as usize * self.width as usize;
        self.pixels[row + x0 as usize..=row + x1 as usize].fill(color);
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        for dy in 0..height {
            self.fill_span(y + dy, x, x + width - 1, color);
        }
    }

    /// Dots every `spacing` pixels in both directions.
    pub fn draw_grid(&mut self, spacing: u32, color: u32) {
        let spacing = spacing.max(1) as usize;
        let width = self.width as usize;
        for (y, row) in self.pixels.chunks_exact_mut(width.max(1)).enumerate() {
            if y % spacing != 0 {
                continue;
            }
            for pixel in row.iter_mut().step_by(spacing) {
                *pixel = color;
            }
        }
    }

    /// The pixels as RGBA8 bytes, the layout image consumers expect.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&p| color::unpack(p)).collect()
    }
}

fn allocate_pixels(width: u32, height: u32) -> Result<Vec<u32>, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    let len = width as usize * height as usize;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|source| RenderError::Allocation {
            what: "frame buffer",
            source,
        })?;
    pixels.resize(len, color::BLACK);
    Ok(pixels)
}
