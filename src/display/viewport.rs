//! Mapping between terminal cells and radar canvas pixels.
//!
//! Each terminal cell shows two vertically stacked virtual pixels using the
//! upper half block, so a cell is treated as 1 px wide and 2 px tall. The
//! canvas is scaled uniformly to the largest size that fits and centered.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use crate::geometry::Point;
use crate::renderer::Canvas;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Cells the canvas occupies.
    pub area: Rect,
    canvas_width: usize,
    canvas_height: usize,
}

impl Viewport {
    pub fn fit(available: Rect, canvas_width: usize, canvas_height: usize) -> Self {
        if canvas_width == 0 || canvas_height == 0 {
            return Self::default();
        }

        let scale = (available.width as f64 / canvas_width as f64)
            .min(available.height as f64 * 2.0 / canvas_height as f64);
        let cols = ((canvas_width as f64 * scale).floor() as u16).min(available.width);
        let rows = ((canvas_height as f64 * scale / 2.0).floor() as u16).min(available.height);

        Self {
            area: Rect::new(
                available.x + (available.width - cols) / 2,
                available.y + (available.height - rows) / 2,
                cols,
                rows,
            ),
            canvas_width,
            canvas_height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.area.width == 0 || self.area.height == 0
    }

    /// Canvas pixels per virtual pixel, horizontally.
    fn span_x(&self) -> f64 {
        self.canvas_width as f64 / self.area.width as f64
    }

    /// Canvas pixels per virtual pixel, vertically (half a cell).
    fn span_y(&self) -> f64 {
        self.canvas_height as f64 / (self.area.height as f64 * 2.0)
    }

    /// Canvas position under the middle of a cell, or `None` outside the
    /// viewport.
    pub fn cell_to_canvas(&self, column: u16, row: u16) -> Option<Point> {
        if self.is_empty() || !self.area.contains((column, row).into()) {
            return None;
        }
        let col = (column - self.area.x) as f64;
        let row = (row - self.area.y) as f64;
        Some(Point::new(
            (col + 0.5) * self.span_x(),
            (row * 2.0 + 1.0) * self.span_y(),
        ))
    }

    /// Cell covering a canvas position, or `None` off-canvas.
    pub fn canvas_to_cell(&self, point: Point) -> Option<(u16, u16)> {
        if self.is_empty()
            || point.x < 0.0
            || point.y < 0.0
            || point.x >= self.canvas_width as f64
            || point.y >= self.canvas_height as f64
        {
            return None;
        }
        let col = (point.x / self.span_x()).floor() as u16;
        let row = (point.y / (self.span_y() * 2.0)).floor() as u16;
        Some((
            self.area.x + col.min(self.area.width - 1),
            self.area.y + row.min(self.area.height - 1),
        ))
    }

    /// Canvas pixel rectangle `[x0, x1) × [y0, y1)` behind a virtual pixel.
    fn source_rect(&self, vx: u16, vy: u16) -> (usize, usize, usize, usize) {
        let (sx, sy) = (self.span_x(), self.span_y());
        let x0 = (vx as f64 * sx).floor() as usize;
        let y0 = (vy as f64 * sy).floor() as usize;
        let x1 = (((vx + 1) as f64 * sx).ceil() as usize).max(x0 + 1);
        let y1 = (((vy + 1) as f64 * sy).ceil() as usize).max(y0 + 1);
        (x0, y0, x1, y1)
    }
}

/// Presents a [`Canvas`] through a [`Viewport`] with half-block cells, then
/// writes its labels as plain text.
pub struct CanvasView<'a> {
    canvas: &'a Canvas,
    viewport: Viewport,
}

impl<'a> CanvasView<'a> {
    pub fn new(canvas: &'a Canvas, viewport: Viewport) -> Self {
        Self { canvas, viewport }
    }
}

/// Labels are anchored at their baseline; nudge up to the middle of a
/// 12 px line of text before picking a row.
const LABEL_BASELINE_LIFT: f64 = 6.0;

impl Widget for CanvasView<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let vp = self.viewport;
        if vp.is_empty() {
            return;
        }

        for row in 0..vp.area.height {
            for col in 0..vp.area.width {
                let (x0, y0, x1, y1) = vp.source_rect(col, row * 2);
                let (ur, ug, ub) = self.canvas.average(x0, y0, x1, y1);
                let (x0, y0, x1, y1) = vp.source_rect(col, row * 2 + 1);
                let (lr, lg, lb) = self.canvas.average(x0, y0, x1, y1);

                if let Some(cell) = buf.cell_mut((vp.area.x + col, vp.area.y + row)) {
                    cell.set_char('▀')
                        .set_fg(Color::Rgb(ur, ug, ub))
                        .set_bg(Color::Rgb(lr, lg, lb));
                }
            }
        }

        let right = vp.area.x + vp.area.width;
        for label in self.canvas.labels() {
            let anchor = Point::new(label.at.x, label.at.y - LABEL_BASELINE_LIFT);
            let Some((col, row)) = vp.canvas_to_cell(anchor) else {
                continue;
            };
            let (r, g, b) = label.color.over(palette::Srgb::new(0, 0, 0)).into_components();

            for (i, ch) in label.text.chars().enumerate() {
                let x = col + i as u16;
                if x >= right {
                    break;
                }
                if let Some(cell) = buf.cell_mut((x, row)) {
                    cell.set_char(ch).set_fg(Color::Rgb(r, g, b));
                }
            }
        }
    }
}
