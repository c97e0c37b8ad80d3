/// Half-block presentation of a frame buffer in a 24-bit color terminal
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use softrast_core::{color, FrameBuffer};
use std::io::{self, Write};

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '▀';

/// Terminal rows and the pixel size of a frame buffer that fills them.
///
/// The last row is kept for the status line; each remaining row holds two
/// pixel rows.
pub fn viewport_for(columns: u16, rows: u16) -> (u32, u32) {
    let width = u32::from(columns.max(1));
    let height = u32::from(rows.saturating_sub(1).max(1)) * 2;
    (width, height)
}

fn to_color(pixel: u32) -> Color {
    let [r, g, b, _] = color::unpack(pixel);
    Color::Rgb { r, g, b }
}

/// Queues the frame buffer, starting at the top-left cell.
///
/// Color changes are only emitted when a cell differs from the one before
/// it on the same row.
pub fn draw<W: Write>(writer: &mut W, framebuffer: &FrameBuffer) -> io::Result<()> {
    let rows = framebuffer.height() / 2;
    for row in 0..rows {
        writer.queue(cursor::MoveTo(0, row as u16))?;
        let mut current = None;

        for x in 0..framebuffer.width() as i32 {
            let y = (row * 2) as i32;
            let top = framebuffer.get_pixel(x, y).unwrap_or(color::BLACK);
            let bottom = framebuffer.get_pixel(x, y + 1).unwrap_or(color::BLACK);

            if current != Some((top, bottom)) {
                writer.queue(SetForegroundColor(to_color(top)))?;
                writer.queue(SetBackgroundColor(to_color(bottom)))?;
                current = Some((top, bottom));
            }
            writer.queue(Print(HALF_BLOCK))?;
        }
    }
    writer.queue(ResetColor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_reserves_status_line() {
        assert_eq!(viewport_for(80, 24), (80, 46));
        assert_eq!(viewport_for(0, 0), (1, 2));
        assert_eq!(viewport_for(10, 1), (10, 2));
    }

    #[test]
    fn test_draw_emits_one_cell_per_pixel_pair() {
        let mut framebuffer = FrameBuffer::new(3, 4).unwrap();
        framebuffer.clear(color::BLACK);
        framebuffer.set_pixel(1, 0, color::WHITE);
        framebuffer.set_pixel(2, 3, color::pack(255, 0, 0, 255));

        let mut out = Vec::new();
        draw(&mut out, &framebuffer).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
        assert!(text.contains("38;2;255;255;255"));
        assert!(text.contains("48;2;255;0;0"));
    }

    #[test]
    fn test_uniform_rows_set_colors_once() {
        let framebuffer = FrameBuffer::new(8, 2).unwrap();
        let mut out = Vec::new();
        draw(&mut out, &framebuffer).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("38;2;0;0;0").count(), 1);
    }
}
