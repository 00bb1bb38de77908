//! Canvas geometry: points, drawing modes and grid snapping.

use crate::error::{SketchError, SketchResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default grid size in canvas units
pub const DEFAULT_SNAP_SIZE: i32 = 10;

/// Integer canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: i32,
    pub y: i32,
}

impl CanvasPoint {
    /// Creates a new canvas point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Snaps both axes to a grid of `snap_size`.
    pub fn snapped(self, snap_size: i32) -> Self {
        Self::new(snap(self.x, snap_size), snap(self.y, snap_size))
    }

    /// Euclidean distance to `other`, rounded to the nearest integer
    /// (ties to even). Distances past `i32::MAX` saturate.
    pub fn distance_to(&self, other: &CanvasPoint) -> i32 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy).round_ties_even() as i32
    }
}

impl fmt::Display for CanvasPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Drawing modes for the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingMode {
    /// Press and release mark the two ends of a line segment
    #[default]
    Vector,
    /// Press marks the centre, release a point on the rim
    Circle,
}

impl fmt::Display for DrawingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vector => write!(f, "vector"),
            Self::Circle => write!(f, "circle"),
        }
    }
}

/// Snap `value` down to a multiple of `snap_size`.
///
/// Uses the remainder operator, so negative values move toward zero.
/// A size of 1 leaves values unchanged.
pub fn snap(value: i32, snap_size: i32) -> i32 {
    if snap_size <= 1 {
        return value;
    }
    value - value % snap_size
}

/// Check that `snap_size` is usable as a grid size.
pub fn validate_snap_size(snap_size: i32) -> SketchResult<i32> {
    if snap_size < 1 {
        return Err(SketchError::InvalidSnapSize(snap_size));
    }
    Ok(snap_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap() {
        assert_eq!(snap(37, 10), 30);
        assert_eq!(snap(40, 10), 40);
        assert_eq!(snap(9, 10), 0);
        assert_eq!(snap(-15, 10), -10);
        assert_eq!(snap(37, 1), 37);
    }

    #[test]
    fn test_snapped_point() {
        assert_eq!(CanvasPoint::new(123, 58).snapped(10), CanvasPoint::new(120, 50));
        assert_eq!(CanvasPoint::new(123, 58).snapped(25), CanvasPoint::new(100, 50));
    }

    #[test]
    fn test_distance() {
        let a = CanvasPoint::new(0, 0);
        assert_eq!(a.distance_to(&CanvasPoint::new(30, 40)), 50);
        assert_eq!(a.distance_to(&CanvasPoint::new(10, 10)), 14);
        assert_eq!(a.distance_to(&a), 0);
    }

    #[test]
    fn test_distance_across_full_range() {
        let left = CanvasPoint::new(i32::MIN, i32::MIN);
        let right = CanvasPoint::new(i32::MAX, 0);
        assert_eq!(left.distance_to(&right), i32::MAX);
        assert_eq!(
            CanvasPoint::new(i32::MIN, 0).distance_to(&CanvasPoint::new(0, 0)),
            i32::MAX
        );
    }

    #[test]
    fn test_validate_snap_size() {
        assert_eq!(validate_snap_size(10), Ok(10));
        assert!(validate_snap_size(0).is_err());
        assert!(validate_snap_size(-5).is_err());
    }
}
