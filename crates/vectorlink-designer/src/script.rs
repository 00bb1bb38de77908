//! Line-oriented sketch scripts.
//!
//! One command per line:
//!
//! ```text
//! # comment
//! snap 10
//! line 10 20 30 40        # x1 y1 x2 y2
//! circle 100 100 130 140  # centre x y, rim x y
//! ```

use crate::error::{SketchError, SketchResult};
use crate::sketcher::Sketcher;
use std::str::FromStr;
use vectorlink_core::Coordinate;

/// A parsed script command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchCommand {
    Line { x1: i32, y1: i32, x2: i32, y2: i32 },
    Circle { cx: i32, cy: i32, rim_x: i32, rim_y: i32 },
    Snap(i32),
}

impl SketchCommand {
    /// Parse one script line; blank lines and comments give `None`.
    pub fn parse_line(line: &str) -> SketchResult<Option<Self>> {
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        if line.trim().is_empty() {
            return Ok(None);
        }
        line.parse().map(Some)
    }

    /// Apply the command, returning any coordinates it appended.
    pub fn apply(self, sketcher: &mut Sketcher) -> SketchResult<Vec<Coordinate>> {
        match self {
            Self::Line { x1, y1, x2, y2 } => Ok(sketcher.line(x1, y1, x2, y2)),
            Self::Circle {
                cx,
                cy,
                rim_x,
                rim_y,
            } => Ok(sketcher.circle(cx, cy, rim_x, rim_y)),
            Self::Snap(size) => {
                sketcher.set_snap_size(size)?;
                Ok(Vec::new())
            }
        }
    }
}

fn numbers(command: &str, args: &[&str], expected: usize) -> SketchResult<Vec<i32>> {
    if args.len() != expected {
        return Err(SketchError::WrongArity {
            command: command.to_string(),
            expected,
            actual: args.len(),
        });
    }
    args.iter()
        .map(|a| {
            a.parse::<i32>()
                .map_err(|_| SketchError::InvalidNumber(a.to_string()))
        })
        .collect()
}

impl FromStr for SketchCommand {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        match command.as_str() {
            "line" | "l" => {
                let n = numbers(&command, &args, 4)?;
                Ok(Self::Line {
                    x1: n[0],
                    y1: n[1],
                    x2: n[2],
                    y2: n[3],
                })
            }
            "circle" | "c" => {
                let n = numbers(&command, &args, 4)?;
                Ok(Self::Circle {
                    cx: n[0],
                    cy: n[1],
                    rim_x: n[2],
                    rim_y: n[3],
                })
            }
            "snap" => {
                let n = numbers(&command, &args, 1)?;
                Ok(Self::Snap(n[0]))
            }
            other => Err(SketchError::UnknownCommand(other.to_string())),
        }
    }
}
