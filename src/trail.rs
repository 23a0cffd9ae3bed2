use std::collections::VecDeque;

use crate::geometry::Point;

/// Number of past beam endpoints kept on screen.
pub const TRAIL_CAPACITY: usize = 50;

/// Bounded, chronologically ordered history of beam endpoints.
///
/// The only way anything leaves the buffer is the automatic front eviction in
/// [`TrailBuffer::push`].
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    points: VecDeque<Point>,
    capacity: usize,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append the newest endpoint, evicting the oldest one if that overflows.
    pub fn push(&mut self, point: Point) {
        self.points.push_back(point);
        if self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new(TRAIL_CAPACITY)
    }
}
