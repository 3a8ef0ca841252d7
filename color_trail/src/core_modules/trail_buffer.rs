// THEORY:
// The `TrailBuffer` is the only piece of per-color memory in the tracker. It
// holds the most recent `capacity` observations of one color, newest first,
// including frames where the color was not seen. Those gaps matter: the trail
// is drawn as a chain of segments between consecutive observations, and no
// segment may bridge a frame where the target was missing.
//
// Key architectural principles:
// 1.  **Fixed Capacity, Age Eviction**: Pushing into a full buffer drops the
//     oldest observation. The buffer is never cleared explicitly.
// 2.  **Owned, Not Global**: Each tracked color owns its buffer inside the
//     pipeline, so buffers are independent and testable in isolation.
// 3.  **Re-derivable Segments**: `segments()` borrows the current state and
//     lazily yields drawable pairs; calling it again restarts from the front.

use crate::core_modules::blob::Point;
use std::collections::VecDeque;

pub const DEFAULT_TRAIL_CAPACITY: usize = 32;

/// One observation: the centroid, or `None` when the color was absent.
pub type TrackPoint = Option<Point>;

/// A drawable link between two consecutive present observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailSegment {
    /// Position of the older endpoint, counted from the front (1..len).
    pub index: usize,
    pub newer: Point,
    pub older: Point,
}

/// Newest-first history of a tracked color's positions.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    capacity: usize,
    points: VecDeque<TrackPoint>,
}

impl TrailBuffer {
    /// Creates an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    /// Inserts the newest observation, evicting the oldest when full.
    pub fn push_front(&mut self, point: TrackPoint) {
        if self.points.len() == self.capacity {
            self.points.pop_back();
        }
        self.points.push_front(point);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent observation, if any frame has been pushed.
    pub fn latest(&self) -> Option<TrackPoint> {
        self.points.front().copied()
    }

    /// Observations from newest to oldest.
    pub fn points(&self) -> impl Iterator<Item = TrackPoint> + '_ {
        self.points.iter().copied()
    }

    /// Adjacent present pairs `(points[i-1], points[i])` for `i` in `1..len`.
    pub fn segments(&self) -> impl Iterator<Item = TrailSegment> + '_ {
        (1..self.points.len()).filter_map(move |i| match (self.points[i - 1], self.points[i]) {
            (Some(newer), Some(older)) => Some(TrailSegment { index: i, newer, older }),
            _ => None,
        })
    }
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_CAPACITY)
    }
}
