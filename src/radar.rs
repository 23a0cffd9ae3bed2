//! Animation state and per-frame stepping for the radar.

use crate::color::RadarColors;
use crate::geometry::{self, Detection, DetectionPolicy, Point};
use crate::pointer::PointerSample;
use crate::renderer::compositor;
use crate::renderer::Surface;
use crate::trail::TrailBuffer;

/// Side length of the radar canvas, in pixels.
pub const CANVAS_SIZE: usize = 400;

/// Space kept between the radar rim and the canvas edge, for labels.
pub const MARGIN: f64 = 50.0;

/// Sweep advance per frame, in radians.
pub const SWEEP_STEP: f64 = 0.01;

/// Sweep angle and fixed radar placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarState {
    /// Radians. Starts at zero, only ever grows; never reduced modulo 2π.
    pub angle: f64,
    pub center: Point,
    pub radius: f64,
}

impl RadarState {
    pub fn new(width: usize, height: usize) -> Self {
        let side = width.min(height) as f64;
        Self {
            angle: 0.0,
            center: Point::new(width as f64 / 2.0, height as f64 / 2.0),
            radius: (side / 2.0 - MARGIN).max(0.0),
        }
    }

    /// Tip of the beam at the current sweep angle.
    pub fn beam_end(&self) -> Point {
        self.center.offset(self.angle, self.radius)
    }

    /// Current sweep bearing in whole degrees, `0..360`.
    pub fn bearing_degrees(&self) -> u16 {
        (self.angle.to_degrees().rem_euclid(360.0).round() as u16) % 360
    }
}

/// Owns everything the frame loop mutates: sweep state and trail.
pub struct Radar {
    state: RadarState,
    trail: TrailBuffer,
    policy: DetectionPolicy,
    colors: RadarColors,
    frames: u64,
}

impl Radar {
    pub fn new(width: usize, height: usize, policy: DetectionPolicy) -> Self {
        Self {
            state: RadarState::new(width, height),
            trail: TrailBuffer::default(),
            policy,
            colors: RadarColors::default(),
            frames: 0,
        }
    }

    pub fn state(&self) -> &RadarState {
        &self.state
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    /// Number of completed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run the detector for this frame. Inactive pointers yield nothing, so a
    /// result from an earlier frame can never leak into the current one.
    pub fn detect(&self, pointer: PointerSample) -> Option<Detection> {
        if !pointer.active {
            return None;
        }
        Some(geometry::detect(
            pointer.position,
            self.state.center,
            self.state.radius,
            self.state.angle,
            self.policy,
        ))
    }

    /// Draw the current state without advancing it.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, pointer: PointerSample) -> Option<Detection> {
        let detection = self.detect(pointer);
        compositor::compose(surface, &self.state, &self.trail, detection.as_ref(), &self.colors);
        detection
    }

    /// Step the sweep by one increment and record the new beam tip.
    ///
    /// Called after drawing, so frame 0 shows no trail and a frame never
    /// shows more than [`TRAIL_CAPACITY`](crate::trail::TRAIL_CAPACITY) trail lines.
    pub fn advance(&mut self) {
        self.state.angle += SWEEP_STEP;
        self.trail.push(self.state.beam_end());
        self.frames += 1;
    }
}
