//! Gesture-driven producer for the point log.
//!
//! A press starts a gesture at the snapped pointer position and a release
//! completes it. Completed gestures are turned into fully formed
//! [`Coordinate`]s and appended to the [`PointLog`] in one go, so the
//! transmitter never sees half of a shape.

use crate::canvas::{validate_snap_size, CanvasPoint, DrawingMode, DEFAULT_SNAP_SIZE};
use crate::error::SketchResult;
use vectorlink_core::{Coordinate, PointLog};

/// Gesture in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Anchor {
    point: CanvasPoint,
    mode: DrawingMode,
}

/// Turns press/release gestures into coordinates on a shared log.
#[derive(Debug)]
pub struct Sketcher {
    log: PointLog,
    snap_size: i32,
    mode: DrawingMode,
    anchor: Option<Anchor>,
}

impl Sketcher {
    /// Create a sketcher appending to `log` with grid size `snap_size`.
    pub fn new(log: PointLog, snap_size: i32) -> SketchResult<Self> {
        Ok(Self {
            log,
            snap_size: validate_snap_size(snap_size)?,
            mode: DrawingMode::default(),
            anchor: None,
        })
    }

    /// Sketcher with the default 10-unit grid.
    pub fn with_default_grid(log: PointLog) -> Self {
        Self {
            log,
            snap_size: DEFAULT_SNAP_SIZE,
            mode: DrawingMode::default(),
            anchor: None,
        }
    }

    pub fn mode(&self) -> DrawingMode {
        self.mode
    }

    /// Switch mode. A gesture already in progress keeps the mode it started with.
    pub fn set_mode(&mut self, mode: DrawingMode) {
        self.mode = mode;
    }

    pub fn snap_size(&self) -> i32 {
        self.snap_size
    }

    pub fn set_snap_size(&mut self, snap_size: i32) -> SketchResult<()> {
        self.snap_size = validate_snap_size(snap_size)?;
        Ok(())
    }

    /// The log coordinates are appended to.
    pub fn log(&self) -> &PointLog {
        &self.log
    }

    /// Whether a press has not yet been matched by a release.
    pub fn is_drawing(&self) -> bool {
        self.anchor.is_some()
    }

    /// Start a gesture; returns the snapped anchor point.
    ///
    /// A second press before a release restarts the gesture.
    pub fn press(&mut self, x: i32, y: i32) -> CanvasPoint {
        let point = CanvasPoint::new(x, y).snapped(self.snap_size);
        self.anchor = Some(Anchor {
            point,
            mode: self.mode,
        });
        point
    }

    /// Finish the gesture and append its coordinates.
    ///
    /// Returns the coordinates appended; empty if no gesture was in progress.
    pub fn release(&mut self, x: i32, y: i32) -> Vec<Coordinate> {
        let Some(anchor) = self.anchor.take() else {
            tracing::debug!("Release at ({}, {}) without a press, ignored", x, y);
            return Vec::new();
        };

        let end = CanvasPoint::new(x, y).snapped(self.snap_size);
        let coordinates = match anchor.mode {
            DrawingMode::Vector => vec![
                Coordinate::vector_start(anchor.point.x, anchor.point.y),
                Coordinate::vector_end(end.x, end.y),
            ],
            // Pen-up travel to the centre, then the circle itself
            DrawingMode::Circle => vec![
                Coordinate::vector_start(anchor.point.x, anchor.point.y),
                Coordinate::circle(
                    anchor.point.x,
                    anchor.point.y,
                    anchor.point.distance_to(&end),
                ),
            ],
        };

        self.log.extend(coordinates.iter().copied());
        tracing::debug!(
            "{} from {} to {} added {} points",
            anchor.mode,
            anchor.point,
            end,
            coordinates.len()
        );
        coordinates
    }

    /// Draw a complete line segment.
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Vec<Coordinate> {
        self.gesture(DrawingMode::Vector, (x1, y1), (x2, y2))
    }

    /// Draw a complete circle from its centre and a point on the rim.
    pub fn circle(&mut self, cx: i32, cy: i32, rim_x: i32, rim_y: i32) -> Vec<Coordinate> {
        self.gesture(DrawingMode::Circle, (cx, cy), (rim_x, rim_y))
    }

    fn gesture(&mut self, mode: DrawingMode, from: (i32, i32), to: (i32, i32)) -> Vec<Coordinate> {
        let previous = self.mode;
        self.mode = mode;
        self.press(from.0, from.1);
        self.mode = previous;
        self.release(to.0, to.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectorlink_core::Identifier;

    #[test]
    fn test_vector_gesture() {
        let log = PointLog::new();
        let mut sketcher = Sketcher::new(log.clone(), 10).unwrap();

        assert_eq!(sketcher.press(13, 27), CanvasPoint::new(10, 20));
        assert!(sketcher.is_drawing());
        let added = sketcher.release(38, 44);

        assert_eq!(
            added,
            vec![Coordinate::vector_start(10, 20), Coordinate::vector_end(30, 40)]
        );
        assert_eq!(log.snapshot(), added);
        assert!(!sketcher.is_drawing());
    }

    #[test]
    fn test_circle_gesture() {
        let log = PointLog::new();
        let mut sketcher = Sketcher::new(log.clone(), 10).unwrap();
        sketcher.set_mode(DrawingMode::Circle);

        sketcher.press(100, 100);
        let added = sketcher.release(131, 142);

        assert_eq!(
            added,
            vec![Coordinate::vector_start(100, 100), Coordinate::circle(100, 100, 50)]
        );
        assert_eq!(log.snapshot(), added);
    }

    #[test]
    fn test_circle_at_extreme_coordinates() {
        let log = PointLog::new();
        let mut sketcher = Sketcher::new(log.clone(), 1).unwrap();

        let added = sketcher.circle(i32::MIN, 0, i32::MAX, 0);
        assert_eq!(added.len(), 2);
        assert_eq!(added[1].identifier, Identifier::Circle);
        assert_eq!(added[1].z, i32::MAX);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_release_without_press() {
        let log = PointLog::new();
        let mut sketcher = Sketcher::with_default_grid(log.clone());
        assert!(sketcher.release(10, 10).is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_mode_change_mid_gesture() {
        let log = PointLog::new();
        let mut sketcher = Sketcher::with_default_grid(log);
        sketcher.press(0, 0);
        sketcher.set_mode(DrawingMode::Circle);
        let added = sketcher.release(20, 0);
        assert_eq!(added.len(), 2);
        assert_eq!(sketcher.mode(), DrawingMode::Circle);
    }

    #[test]
    fn test_helpers_keep_mode() {
        let log = PointLog::new();
        let mut sketcher = Sketcher::with_default_grid(log.clone());
        sketcher.set_mode(DrawingMode::Circle);

        sketcher.line(0, 0, 10, 10);
        assert_eq!(sketcher.mode(), DrawingMode::Circle);
        sketcher.circle(50, 50, 50, 80);

        let ids: Vec<Identifier> = log.snapshot().iter().map(|c| c.identifier).collect();
        assert_eq!(
            ids,
            vec![
                Identifier::Vector,
                Identifier::Vector,
                Identifier::Vector,
                Identifier::Circle
            ]
        );
        assert_eq!(log.get(2), Some(Coordinate::vector_start(50, 50)));
        assert_eq!(log.get(3).map(|c| c.z), Some(30));
    }

    #[test]
    fn test_invalid_snap_size() {
        assert!(Sketcher::new(PointLog::new(), 0).is_err());
        let mut sketcher = Sketcher::with_default_grid(PointLog::new());
        assert!(sketcher.set_snap_size(-1).is_err());
        assert_eq!(sketcher.snap_size(), 10);
    }
}
