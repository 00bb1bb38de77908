//! # VectorLink Designer
//!
//! The producer side of the pipeline: snaps pointer positions to a grid and
//! turns line and circle gestures into [`vectorlink_core::Coordinate`]s on the
//! shared point log. Rendering and windowing live elsewhere.

pub mod canvas;
pub mod error;
pub mod script;
pub mod sketcher;

pub use canvas::{snap, CanvasPoint, DrawingMode, DEFAULT_SNAP_SIZE};
pub use error::{SketchError, SketchResult};
pub use script::SketchCommand;
pub use sketcher::Sketcher;
