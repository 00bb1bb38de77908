//! Append-only log of coordinates waiting to be streamed
//!
//! The sketching side appends; the transmitter reads by index with its own
//! cursor. Entries are never mutated, removed or reordered, so an index that
//! resolved once resolves to the same coordinate forever.

use crate::coordinate::Coordinate;
use crate::types::{thread_safe_rw, ThreadSafeRw};

/// Shared, insertion-ordered store of [`Coordinate`]s.
///
/// Cloning is cheap and every clone refers to the same log.
#[derive(Debug, Clone, Default)]
pub struct PointLog {
    points: ThreadSafeRw<Vec<Coordinate>>,
}

impl PointLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            points: thread_safe_rw(Vec::new()),
        }
    }

    /// Append a coordinate and return its index.
    ///
    /// Only holds the write lock for the push, so it never waits on the
    /// transmitter beyond a concurrent `get`.
    pub fn append(&self, coordinate: Coordinate) -> usize {
        let mut points = self.points.write();
        points.push(coordinate);
        let index = points.len() - 1;
        drop(points);

        tracing::trace!("Appended {} at index {}", coordinate, index);
        index
    }

    /// Append several coordinates atomically, keeping their order
    pub fn extend<I>(&self, coordinates: I)
    where
        I: IntoIterator<Item = Coordinate>,
    {
        self.points.write().extend(coordinates);
    }

    /// Coordinate at `index`, or `None` if it has not been appended yet
    pub fn get(&self, index: usize) -> Option<Coordinate> {
        self.points.read().get(index).copied()
    }

    /// Number of coordinates appended so far
    pub fn len(&self) -> usize {
        self.points.read().len()
    }

    /// Whether nothing has been appended yet
    pub fn is_empty(&self) -> bool {
        self.points.read().is_empty()
    }

    /// Copy of every coordinate appended so far
    pub fn snapshot(&self) -> Vec<Coordinate> {
        self.points.read().clone()
    }
}
