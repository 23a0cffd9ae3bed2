//! 8×8 bitmap font for rasterizing bearing labels onto the canvas.

use super::Canvas;
use crate::color::Rgba;
use crate::geometry::Point;

pub const GLYPH_SIZE: usize = 8;

/// Each glyph is 8 rows, most significant bit leftmost.
fn glyph(ch: char) -> Option<[u8; 8]> {
    Some(match ch {
        '0' => [0x3C, 0x42, 0x46, 0x5A, 0x62, 0x42, 0x3C, 0x00],
        '1' => [0x08, 0x18, 0x28, 0x08, 0x08, 0x08, 0x3E, 0x00],
        '2' => [0x3C, 0x42, 0x02, 0x0C, 0x30, 0x40, 0x7E, 0x00],
        '3' => [0x3C, 0x42, 0x02, 0x1C, 0x02, 0x42, 0x3C, 0x00],
        '4' => [0x04, 0x0C, 0x14, 0x24, 0x7E, 0x04, 0x04, 0x00],
        '5' => [0x7E, 0x40, 0x7C, 0x02, 0x02, 0x42, 0x3C, 0x00],
        '6' => [0x1C, 0x20, 0x40, 0x7C, 0x42, 0x42, 0x3C, 0x00],
        '7' => [0x7E, 0x02, 0x04, 0x08, 0x10, 0x10, 0x10, 0x00],
        '8' => [0x3C, 0x42, 0x42, 0x3C, 0x42, 0x42, 0x3C, 0x00],
        '9' => [0x3C, 0x42, 0x42, 0x3E, 0x02, 0x04, 0x38, 0x00],
        '°' => [0x30, 0x48, 0x48, 0x30, 0x00, 0x00, 0x00, 0x00],
        ' ' => [0x00; 8],
        _ => return None,
    })
}

/// Draw `text` with its baseline-left corner at `at`. Unknown characters
/// still advance the pen.
pub fn render_text(canvas: &mut Canvas, at: Point, text: &str, color: Rgba) {
    let left = at.x.round() as isize;
    let top = at.y.round() as isize - GLYPH_SIZE as isize;

    for (i, ch) in text.chars().enumerate() {
        let Some(bitmap) = glyph(ch) else {
            continue;
        };
        let x = left + (i * GLYPH_SIZE) as isize;

        for (row_idx, &row) in bitmap.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if (row >> (7 - col)) & 1 == 1 {
                    canvas.blend_pixel(x + col as isize, top + row_idx as isize, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bearing_label_has_glyphs() {
        for deg in (0..360).step_by(30) {
            let label = format!("{deg}°");
            assert!(label.chars().all(|c| glyph(c).is_some()), "{label}");
        }
    }

    #[test]
    fn text_sits_above_baseline() {
        let mut canvas = Canvas::new(32, 16);
        render_text(&mut canvas, Point::new(0.0, 10.0), "1", Rgba::opaque(255, 255, 255));

        // Top row of '1' is 0x08: column 4.
        assert_eq!(canvas.get_pixel(4, 2).0, 255);
        // Nothing at or below the baseline.
        assert!((0..32).all(|x| canvas.get_pixel(x, 10).0 == 0));
    }
}
