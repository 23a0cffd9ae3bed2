//! Pixel renderer for the radar display.
//!
//! The compositor draws through the [`Surface`] trait. [`Canvas`] is the
//! owned RGBA raster behind it; output backends (terminal half-blocks, PPM
//! snapshots) convert the canvas to their native format at submission time.

pub mod compositor;
pub mod glyphs;
#[cfg(test)]
pub mod recording;

use palette::Srgb;
use std::io::{self, Write};

use crate::color::Rgba;
use crate::geometry::Point;

/// Primitive 2D drawing operations the radar needs.
pub trait Surface {
    /// Drawable size in pixels (width, height).
    fn size(&self) -> (usize, usize);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba);

    fn stroke_circle(&mut self, center: Point, radius: f64, line_width: f64, color: Rgba);

    fn line(&mut self, from: Point, to: Point, line_width: f64, color: Rgba);

    fn text(&mut self, at: Point, text: &str, color: Rgba);
}

/// A text run placed on the canvas. Kept as an overlay instead of being
/// rasterized, so each backend can render it at its own resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub at: Point,
    pub text: String,
    pub color: Rgba,
}

/// Owned RGBA pixel buffer, 4 bytes per pixel in **RGBA** order.
pub struct Canvas {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
    labels: Vec<Label>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0u8; width * height * 4],
            width,
            height,
            labels: Vec::new(),
        }
    }

    /// Clear to fully transparent black and drop all labels.
    #[inline]
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.labels.clear();
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Composite `color` onto the pixel at (x, y). Out-of-bounds writes are
    /// dropped.
    #[inline]
    pub fn blend_pixel(&mut self, x: isize, y: isize, color: Rgba) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let dst = Srgb::new(self.data[idx], self.data[idx + 1], self.data[idx + 2]);
        let out = color.over(dst);
        let dst_alpha = self.data[idx + 3] as f32 / 255.0;
        let alpha = color.alpha + dst_alpha * (1.0 - color.alpha);

        self.data[idx] = out.red;
        self.data[idx + 1] = out.green;
        self.data[idx + 2] = out.blue;
        self.data[idx + 3] = (alpha * 255.0).round() as u8;
    }

    /// Read the RGBA values at (x, y).
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> (u8, u8, u8, u8) {
        let idx = (y * self.width + x) * 4;
        if x < self.width && idx + 3 < self.data.len() {
            (self.data[idx], self.data[idx + 1], self.data[idx + 2], self.data[idx + 3])
        } else {
            (0, 0, 0, 0)
        }
    }

    /// Mean RGB over the pixel rectangle `[x0, x1) × [y0, y1)`, clipped to
    /// the canvas. Used by backends that show the canvas at lower resolution.
    pub fn average(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> (u8, u8, u8) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        let mut sum = [0u32; 3];
        let mut count = 0u32;

        for y in y0..y1 {
            for x in x0..x1 {
                let (r, g, b, _) = self.get_pixel(x, y);
                sum[0] += r as u32;
                sum[1] += g as u32;
                sum[2] += b as u32;
                count += 1;
            }
        }

        if count == 0 {
            return (0, 0, 0);
        }
        (
            (sum[0] / count) as u8,
            (sum[1] / count) as u8,
            (sum[2] / count) as u8,
        )
    }

    /// Rasterize the label overlays into the pixel data with the bitmap font.
    pub fn burn_labels(&mut self) {
        let labels = std::mem::take(&mut self.labels);
        for label in &labels {
            glyphs::render_text(self, label.at, &label.text, label.color);
        }
    }

    /// Write the canvas as a binary PPM (P6) image. Alpha is dropped.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut rgb = Vec::with_capacity(self.width * self.height * 3);
        for px in self.data.chunks_exact(4).take(self.width * self.height) {
            rgb.extend_from_slice(&px[..3]);
        }
        out.write_all(&rgb)?;
        out.flush()
    }
}

impl Surface for Canvas {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        let x0 = x.max(0.0).floor() as isize;
        let y0 = y.max(0.0).floor() as isize;
        let x1 = (x + width).min(self.width as f64).ceil() as isize;
        let y1 = (y + height).min(self.height as f64).ceil() as isize;

        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color);
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        let r2 = radius * radius;
        let size = (self.width, self.height);
        for_pixels_around(center, radius, size, |px, py, dx, dy| {
            if dx * dx + dy * dy <= r2 {
                self.blend_pixel(px, py, color);
            }
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, line_width: f64, color: Rgba) {
        let half = line_width.max(1.0) / 2.0;
        let size = (self.width, self.height);
        for_pixels_around(center, radius + half, size, |px, py, dx, dy| {
            if ((dx * dx + dy * dy).sqrt() - radius).abs() <= half {
                self.blend_pixel(px, py, color);
            }
        });
    }

    fn line(&mut self, from: Point, to: Point, line_width: f64, color: Rgba) {
        let thickness = line_width.round().max(1.0) as isize;
        let pad = thickness as f64;
        let bounds = (-pad, -pad, self.width as f64 + pad, self.height as f64 + pad);
        let Some((from, to)) = clip_segment(from, to, bounds) else {
            return;
        };
        let steep = (to.y - from.y).abs() > (to.x - from.x).abs();

        bresenham(
            from.x.floor() as isize,
            from.y.floor() as isize,
            to.x.floor() as isize,
            to.y.floor() as isize,
            |x, y| {
                // Thicken across the minor axis so each pixel is hit once.
                for t in 0..thickness {
                    if steep {
                        self.blend_pixel(x + t, y, color);
                    } else {
                        self.blend_pixel(x, y + t, color);
                    }
                }
            },
        );
    }

    fn text(&mut self, at: Point, text: &str, color: Rgba) {
        self.labels.push(Label {
            at,
            text: text.to_string(),
            color,
        });
    }
}

/// Visit every on-canvas pixel whose center lies in the square bounding a
/// circle, passing the offset of the pixel center from `center`.
fn for_pixels_around(
    center: Point,
    radius: f64,
    (width, height): (usize, usize),
    mut visit: impl FnMut(isize, isize, f64, f64),
) {
    let x0 = ((center.x - radius).floor() as isize).max(0);
    let x1 = ((center.x + radius).ceil() as isize).min(width as isize - 1);
    let y0 = ((center.y - radius).floor() as isize).max(0);
    let y1 = ((center.y + radius).ceil() as isize).min(height as isize - 1);

    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = px as f64 + 0.5 - center.x;
            let dy = py as f64 + 0.5 - center.y;
            visit(px, py, dx, dy);
        }
    }
}

/// Coordinates are saturated here before clipping, so infinite endpoints
/// keep their direction without poisoning the clip math.
const FAR_LIMIT: f64 = 1.0e9;

/// Liang-Barsky clip of a segment to `(x_min, y_min, x_max, y_max)`. Returns
/// `None` for segments that miss the box or have a NaN coordinate.
fn clip_segment(from: Point, to: Point, (x_min, y_min, x_max, y_max): (f64, f64, f64, f64)) -> Option<(Point, Point)> {
    if [from.x, from.y, to.x, to.y].iter().any(|v| v.is_nan()) {
        return None;
    }
    let saturate = |p: Point| Point::new(p.x.clamp(-FAR_LIMIT, FAR_LIMIT), p.y.clamp(-FAR_LIMIT, FAR_LIMIT));
    let (from, to) = (saturate(from), saturate(to));

    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, from.x - x_min),
        (dx, x_max - from.x),
        (-dy, from.y - y_min),
        (dy, y_max - from.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| Point::new(from.x + t * dx, from.y + t * dy);
    Some((
        if t0 > 0.0 { at(t0) } else { from },
        if t1 < 1.0 { at(t1) } else { to },
    ))
}

/// Walk a line with Bresenham's algorithm, visiting each pixel exactly once.
fn bresenham(mut x0: isize, mut y0: isize, x1: isize, y1: isize, mut plot: impl FnMut(isize, isize)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx: isize = if x0 < x1 { 1 } else { -1 };
    let sy: isize = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(x0, y0);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
