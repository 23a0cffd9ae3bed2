//! Layered drawing of one radar frame.
//!
//! Layers, back to front: background, face, beam, range rings, bearing spokes
//! with labels, trail, and finally the target marker when a pointer is active.

use std::f64::consts::TAU;

use super::Surface;
use crate::color::RadarColors;
use crate::geometry::Detection;
use crate::radar::RadarState;
use crate::trail::TrailBuffer;

pub const RING_COUNT: usize = 5;
pub const SPOKE_COUNT: usize = 12;
/// Distance past the rim at which bearing labels are placed.
pub const LABEL_OFFSET: f64 = 20.0;
pub const MARKER_RADIUS: f64 = 5.0;

const BEAM_WIDTH: f64 = 2.0;
const GRID_WIDTH: f64 = 1.0;
const TARGET_LINE_WIDTH: f64 = 2.0;

/// Draw a complete frame. `detection` is `None` whenever the pointer is not
/// over the capture surface, in which case no target layer is drawn.
pub fn compose<S: Surface + ?Sized>(
    surface: &mut S,
    state: &RadarState,
    trail: &TrailBuffer,
    detection: Option<&Detection>,
    colors: &RadarColors,
) {
    let (width, height) = surface.size();
    let center = state.center;
    let radius = state.radius;

    surface.fill_rect(0.0, 0.0, width as f64, height as f64, colors.background);
    surface.fill_circle(center, radius, colors.face);
    surface.line(center, state.beam_end(), BEAM_WIDTH, colors.beam);

    draw_rings(surface, state, colors);
    draw_spokes(surface, state, colors);

    for point in trail.iter() {
        surface.line(center, *point, GRID_WIDTH, colors.trail);
    }

    if let Some(detection) = detection {
        surface.fill_circle(detection.projected, MARKER_RADIUS, colors.target(detection.bright));
        surface.line(center, detection.projected, TARGET_LINE_WIDTH, colors.target_line);
    }
}

fn draw_rings<S: Surface + ?Sized>(surface: &mut S, state: &RadarState, colors: &RadarColors) {
    let unit = state.radius / RING_COUNT as f64;
    for i in 1..=RING_COUNT {
        surface.stroke_circle(state.center, unit * i as f64, GRID_WIDTH, colors.grid);
    }
}

fn draw_spokes<S: Surface + ?Sized>(surface: &mut S, state: &RadarState, colors: &RadarColors) {
    for i in 0..SPOKE_COUNT {
        let angle = TAU * i as f64 / SPOKE_COUNT as f64;
        let rim = state.center.offset(angle, state.radius);
        surface.line(state.center, rim, GRID_WIDTH, colors.grid);

        let degrees = 360 / SPOKE_COUNT * i;
        surface.text(rim.offset(angle, LABEL_OFFSET), &format!("{degrees}°"), colors.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{detect, DetectionPolicy, Point};
    use crate::renderer::recording::{Op, Recorder};

    fn state() -> RadarState {
        RadarState::new(400, 400)
    }

    fn trail_of(n: usize) -> TrailBuffer {
        let mut trail = TrailBuffer::default();
        for i in 0..n {
            trail.push(Point::new(i as f64, 0.0));
        }
        trail
    }

    #[test]
    fn layers_are_drawn_in_order() {
        let mut recorder = Recorder::new(400, 400);
        let state = state();
        let colors = RadarColors::default();
        let detection = detect(
            Point::new(300.0, 200.0),
            state.center,
            state.radius,
            state.angle,
            DetectionPolicy::default(),
        );

        compose(&mut recorder, &state, &trail_of(3), Some(&detection), &colors);
        let ops = recorder.ops();

        assert_eq!(ops[0], Op::FillRect { color: colors.background });
        assert!(matches!(ops[1], Op::FillCircle { radius, .. } if radius == 150.0));
        assert!(matches!(ops[2], Op::Line { color, .. } if color == colors.beam));

        let rings: Vec<f64> = ops[3..8]
            .iter()
            .map(|op| match op {
                Op::StrokeCircle { radius, .. } => *radius,
                other => panic!("expected ring, got {other:?}"),
            })
            .collect();
        assert_eq!(rings, vec![30.0, 60.0, 90.0, 120.0, 150.0]);

        // 12 spokes, each followed by its label.
        for i in 0..SPOKE_COUNT {
            assert!(matches!(ops[8 + 2 * i], Op::Line { color, .. } if color == colors.grid));
            assert_eq!(ops[9 + 2 * i].text(), Some(format!("{}°", i * 30).as_str()));
        }

        let trail_ops = &ops[32..35];
        assert!(trail_ops
            .iter()
            .all(|op| matches!(op, Op::Line { color, .. } if *color == colors.trail)));

        assert!(matches!(ops[35], Op::FillCircle { radius, .. } if radius == MARKER_RADIUS));
        assert!(matches!(ops[36], Op::Line { to, .. } if to == detection.projected));
        assert_eq!(ops.len(), 37);
    }

    #[test]
    fn no_target_layer_without_detection() {
        let mut recorder = Recorder::new(400, 400);
        compose(&mut recorder, &state(), &trail_of(50), None, &RadarColors::default());

        let ops = recorder.ops();
        assert_eq!(ops.len(), 32 + 50);
        assert!(!ops
            .iter()
            .any(|op| matches!(op, Op::FillCircle { radius, .. } if *radius == MARKER_RADIUS)));
    }

    #[test]
    fn marker_color_follows_detection() {
        let colors = RadarColors::default();
        let state = state();

        let mut bright = Recorder::new(400, 400);
        let hit = detect(Point::new(350.0, 200.0), state.center, state.radius, 0.0, DetectionPolicy::default());
        compose(&mut bright, &state, &TrailBuffer::default(), Some(&hit), &colors);
        assert!(bright.ops().contains(&Op::FillCircle {
            center: hit.projected,
            radius: MARKER_RADIUS,
            color: colors.target_bright,
        }));

        let mut dim = Recorder::new(400, 400);
        let miss = detect(Point::new(200.0, 350.0), state.center, state.radius, 0.0, DetectionPolicy::default());
        compose(&mut dim, &state, &TrailBuffer::default(), Some(&miss), &colors);
        assert!(dim.ops().contains(&Op::FillCircle {
            center: miss.projected,
            radius: MARKER_RADIUS,
            color: colors.target_dim,
        }));
    }

    #[test]
    fn labels_sit_outside_the_rim() {
        let mut recorder = Recorder::new(400, 400);
        let state = state();
        compose(&mut recorder, &state, &TrailBuffer::default(), None, &RadarColors::default());

        for op in recorder.ops() {
            if let Op::Text { at, .. } = op {
                let d = state.center.distance_to(*at);
                assert!((d - (state.radius + LABEL_OFFSET)).abs() < 1e-9);
            }
        }
    }
}
