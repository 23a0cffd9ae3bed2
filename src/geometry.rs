//! Pointer to radar polar geometry and beam proximity.
//!
//! All functions here are total over finite inputs. The two edge-case
//! behaviors of the detector (projection of points outside the radar disc and
//! the raw, unwrapped beam/bearing difference) are kept by default and can be
//! switched through [`DetectionPolicy`].

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Beam/bearing separation below which a target is drawn bright (10°).
pub const DETECTION_THRESHOLD: f64 = PI / 18.0;

/// A position on the radar canvas, in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point `distance` away from `self` along `angle` (radians, canvas
    /// orientation: 0 points right, positive angles turn clockwise on screen).
    #[inline]
    pub fn offset(self, angle: f64, distance: f64) -> Point {
        Point::new(self.x + angle.cos() * distance, self.y + angle.sin() * distance)
    }

    #[inline]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// What to do with pointers that lie outside the radar disc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionPolicy {
    /// Keep the raw range factor; outside pointers are drawn outside the disc.
    #[default]
    Unclamped,
    /// Clamp the range factor to `[0, 1]`; outside pointers sit on the rim.
    Clamped,
}

/// How the beam/bearing difference is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BearingPolicy {
    /// `|bearing - sweep|` with no wraparound. Since the sweep angle grows
    /// without bound, detection only fires during the first revolution and
    /// never across the ±π seam.
    #[default]
    Raw,
    /// Shortest angular distance, folded into `[0, π]`.
    Wrapped,
}

/// Detector behavior switches, stored in the `[detection]` config table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionPolicy {
    pub projection: ProjectionPolicy,
    pub bearing: BearingPolicy,
}

/// A pointer expressed relative to the radar center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    /// Euclidean distance from the center, in canvas pixels.
    pub distance: f64,
    /// Four-quadrant bearing in `(-π, π]`.
    pub bearing: f64,
    /// `distance / radius`, unclamped.
    pub range_factor: f64,
}

/// Convert a canvas position into polar form about `center`.
pub fn to_polar(pointer: Point, center: Point, radius: f64) -> Polar {
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    let distance = center.distance_to(pointer);
    let range_factor = if radius > 0.0 { distance / radius } else { 0.0 };

    Polar {
        distance,
        bearing: dy.atan2(dx),
        range_factor,
    }
}

/// Place a polar pointer back onto the radar face.
pub fn project(polar: &Polar, center: Point, radius: f64, policy: ProjectionPolicy) -> Point {
    let factor = match policy {
        ProjectionPolicy::Unclamped => polar.range_factor,
        ProjectionPolicy::Clamped => polar.range_factor.clamp(0.0, 1.0),
    };
    center.offset(polar.bearing, factor * radius)
}

/// Angular separation between a target bearing and the sweep angle.
pub fn bearing_difference(bearing: f64, sweep: f64, policy: BearingPolicy) -> f64 {
    match policy {
        BearingPolicy::Raw => (bearing - sweep).abs(),
        BearingPolicy::Wrapped => {
            let d = (bearing - sweep).rem_euclid(TAU);
            d.min(TAU - d)
        }
    }
}

/// Result of running the detector on one pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub polar: Polar,
    pub projected: Point,
    /// Beam is within [`DETECTION_THRESHOLD`] of the target.
    pub bright: bool,
}

pub fn detect(
    pointer: Point,
    center: Point,
    radius: f64,
    sweep: f64,
    policy: DetectionPolicy,
) -> Detection {
    let polar = to_polar(pointer, center, radius);
    let projected = project(&polar, center, radius, policy.projection);
    let diff = bearing_difference(polar.bearing, sweep, policy.bearing);

    Detection {
        polar,
        projected,
        bright: diff < DETECTION_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;
    const CENTER: Point = Point::new(200.0, 200.0);
    const RADIUS: f64 = 150.0;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn polar_of_point_right_of_center() {
        let polar = to_polar(Point::new(350.0, 200.0), CENTER, RADIUS);
        assert!((polar.distance - 150.0).abs() < EPS);
        assert_eq!(polar.bearing, 0.0);
        assert!((polar.range_factor - 1.0).abs() < EPS);
    }

    #[test]
    fn bearing_covers_all_quadrants() {
        let below = to_polar(Point::new(200.0, 260.0), CENTER, RADIUS);
        assert!((below.bearing - PI / 2.0).abs() < EPS);

        let left = to_polar(Point::new(100.0, 200.0), CENTER, RADIUS);
        assert!((left.bearing - PI).abs() < EPS);

        let upper_left = to_polar(Point::new(150.0, 150.0), CENTER, RADIUS);
        assert!((upper_left.bearing + 3.0 * PI / 4.0).abs() < EPS);
    }

    #[test]
    fn unclamped_projection_reproduces_pointer_inside_disc() {
        for pointer in [
            Point::new(250.0, 230.0),
            Point::new(120.0, 180.0),
            Point::new(200.0, 90.0),
            Point::new(201.0, 201.0),
        ] {
            let polar = to_polar(pointer, CENTER, RADIUS);
            let projected = project(&polar, CENTER, RADIUS, ProjectionPolicy::Unclamped);
            assert_close(projected, pointer);
        }
    }

    #[test]
    fn unclamped_projection_keeps_outside_points_outside() {
        let pointer = Point::new(390.0, 10.0);
        let polar = to_polar(pointer, CENTER, RADIUS);
        assert!(polar.range_factor > 1.0);

        let projected = project(&polar, CENTER, RADIUS, ProjectionPolicy::Unclamped);
        assert_close(projected, pointer);
        assert!(CENTER.distance_to(projected) > RADIUS);
    }

    #[test]
    fn clamped_projection_pins_outside_points_to_rim() {
        let pointer = Point::new(390.0, 10.0);
        let polar = to_polar(pointer, CENTER, RADIUS);
        let projected = project(&polar, CENTER, RADIUS, ProjectionPolicy::Clamped);

        assert!((CENTER.distance_to(projected) - RADIUS).abs() < EPS);
        let reprojected = to_polar(projected, CENTER, RADIUS);
        assert!((reprojected.bearing - polar.bearing).abs() < EPS);
    }

    #[test]
    fn clamped_projection_leaves_inside_points_alone() {
        let pointer = Point::new(250.0, 230.0);
        let polar = to_polar(pointer, CENTER, RADIUS);
        let projected = project(&polar, CENTER, RADIUS, ProjectionPolicy::Clamped);
        assert_close(projected, pointer);
    }

    #[test]
    fn pointer_on_beam_is_bright() {
        let detection = detect(
            Point::new(350.0, 200.0),
            CENTER,
            RADIUS,
            0.0,
            DetectionPolicy::default(),
        );
        assert!(detection.bright);
        assert_eq!(detection.projected, Point::new(350.0, 200.0));
    }

    #[test]
    fn pointer_quarter_turn_from_beam_is_dim() {
        let detection = detect(
            Point::new(350.0, 200.0),
            CENTER,
            RADIUS,
            PI / 2.0,
            DetectionPolicy::default(),
        );
        assert!(!detection.bright);
    }

    #[test]
    fn threshold_is_strict() {
        assert!(bearing_difference(0.0, DETECTION_THRESHOLD, BearingPolicy::Raw) >= DETECTION_THRESHOLD);
        let sweep = DETECTION_THRESHOLD * 0.99;
        let detection = detect(
            Point::new(350.0, 200.0),
            CENTER,
            RADIUS,
            sweep,
            DetectionPolicy::default(),
        );
        assert!(detection.bright);
    }

    #[test]
    fn raw_difference_misses_targets_after_first_revolution() {
        let sweep = TAU + 0.01;
        assert!(bearing_difference(0.0, sweep, BearingPolicy::Raw) > DETECTION_THRESHOLD);
        assert!(bearing_difference(0.0, sweep, BearingPolicy::Wrapped) < DETECTION_THRESHOLD);
    }

    #[test]
    fn wrapped_difference_crosses_the_seam() {
        // Target just below the -π/π seam, beam just above it.
        let bearing = -PI + 0.02;
        let sweep = PI - 0.02;
        assert!(bearing_difference(bearing, sweep, BearingPolicy::Raw) > PI);

        let wrapped = bearing_difference(bearing, sweep, BearingPolicy::Wrapped);
        assert!((wrapped - 0.04).abs() < 1e-12);
    }

    #[test]
    fn zero_radius_does_not_produce_nan() {
        let polar = to_polar(Point::new(10.0, 10.0), Point::new(0.0, 0.0), 0.0);
        assert_eq!(polar.range_factor, 0.0);
        let projected = project(&polar, Point::new(0.0, 0.0), 0.0, ProjectionPolicy::Unclamped);
        assert_close(projected, Point::new(0.0, 0.0));
    }
}
