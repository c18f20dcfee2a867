use std::collections::VecDeque;

use crate::foundation::core::{BezPath, Point};

/// Bounded, insertion-ordered history of curve points.
///
/// Appends past capacity evict from the front one point at a time.
#[derive(Clone, Debug)]
pub struct Trail {
    points: VecDeque<Point>,
    capacity: usize,
}

impl Trail {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
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

    /// Append `p`, returning the evicted oldest point if the trail was full.
    pub fn push(&mut self, p: Point) -> Option<Point> {
        self.points.push_back(p);
        if self.points.len() > self.capacity {
            self.points.pop_front()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn oldest(&self) -> Option<Point> {
        self.points.front().copied()
    }

    pub fn newest(&self) -> Option<Point> {
        self.points.back().copied()
    }

    /// Points oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    /// Connected polyline through every point, or `None` with fewer than two points.
    pub fn to_polyline(&self) -> Option<BezPath> {
        if self.points.len() < 2 {
            return None;
        }
        let mut iter = self.iter();
        let mut path = BezPath::new();
        path.move_to(iter.next()?);
        for p in iter {
            path.line_to(p);
        }
        Some(path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/curve/trail.rs"]
mod tests;
