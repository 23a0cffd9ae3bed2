//! A [`Surface`] that records draw calls instead of rasterizing them.

use super::Surface;
use crate::color::Rgba;
use crate::geometry::Point;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    FillRect { color: Rgba },
    FillCircle { center: Point, radius: f64, color: Rgba },
    StrokeCircle { center: Point, radius: f64, color: Rgba },
    Line { from: Point, to: Point, width: f64, color: Rgba },
    Text { at: Point, text: String, color: Rgba },
}

impl Op {
    pub fn text(&self) -> Option<&str> {
        match self {
            Op::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

pub struct Recorder {
    width: usize,
    height: usize,
    ops: Vec<Op>,
}

impl Recorder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }
}

impl Surface for Recorder {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, _x: f64, _y: f64, _width: f64, _height: f64, color: Rgba) {
        self.ops.push(Op::FillRect { color });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.ops.push(Op::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, _line_width: f64, color: Rgba) {
        self.ops.push(Op::StrokeCircle { center, radius, color });
    }

    fn line(&mut self, from: Point, to: Point, line_width: f64, color: Rgba) {
        self.ops.push(Op::Line {
            from,
            to,
            width: line_width,
            color,
        });
    }

    fn text(&mut self, at: Point, text: &str, color: Rgba) {
        self.ops.push(Op::Text {
            at,
            text: text.to_string(),
            color,
        });
    }
}
