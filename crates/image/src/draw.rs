//! Overlay primitives on `Rgb8` images. All primitives clip to the image.

use crate::{font, *};

pub type Rgb = [u8; 3];

pub const WHITE: Rgb = [255, 255, 255];
pub const GRAY: Rgb = [100, 100, 100];
pub const RED: Rgb = [255, 0, 0];
pub const GREEN: Rgb = [0, 255, 0];
pub const YELLOW: Rgb = [255, 255, 0];
pub const CYAN: Rgb = [0, 255, 255];
pub const MAGENTA: Rgb = [255, 0, 255];

/// Set one pixel; points outside the image are ignored.
pub fn set_pixel(image: &mut Image, x: i32, y: i32, color: Rgb) {
    if image.format != PixelFormat::Rgb8 || !image.size.contains(x, y) {
        return;
    }
    let idx = (y as usize * image.size.x + x as usize) * 3;
    image.data[idx..idx + 3].copy_from_slice(&color);
}

pub fn get_pixel(image: &Image, x: usize, y: usize) -> Option<Rgb> {
    if image.format != PixelFormat::Rgb8 || x >= image.size.x || y >= image.size.y {
        return None;
    }
    let idx = (y * image.size.x + x) * 3;
    Some([image.data[idx], image.data[idx + 1], image.data[idx + 2]])
}

/// Bresenham line between two points, clipped per pixel.
pub fn draw_line(image: &mut Image, mut x0: i32, mut y0: i32, x1: i32, y1: i32, color: Rgb) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        set_pixel(image, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

pub fn draw_filled_circle(image: &mut Image, cx: i32, cy: i32, radius: i32, color: Rgb) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                set_pixel(image, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Render `text` with the built-in 5x7 font, top-left corner at `(x, y)`.
///
/// Letters are drawn upper-case. `scale` multiplies each font pixel into a
/// `scale`×`scale` block. Returns the x coordinate after the last glyph.
pub fn draw_text(image: &mut Image, x: i32, y: i32, text: &str, scale: i32, color: Rgb) -> i32 {
    let scale = scale.max(1);
    let mut pen = x;
    for ch in text.chars() {
        let glyph = font::glyph(ch);
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..font::GLYPH_WIDTH {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                let px = pen + col as i32 * scale;
                let py = y + row as i32 * scale;
                for sy in 0..scale {
                    for sx in 0..scale {
                        set_pixel(image, px + sx, py + sy, color);
                    }
                }
            }
        }
        pen += font::ADVANCE as i32 * scale;
    }
    pen
}
