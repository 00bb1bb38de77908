//! Feeds sketch commands from a text stream into a [`Sketcher`].

use std::io::BufRead;
use vectorlink_designer::{SketchCommand, Sketcher};

/// Counters for one pass over a command stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    /// Lines read, including comments and blanks
    pub lines: usize,
    /// Lines that were not valid UTF-8 or not a valid command
    pub rejected: usize,
    /// Coordinates appended to the log
    pub points: usize,
}

/// Apply every command line from `reader` to `sketcher`.
///
/// Bad lines are logged and skipped. Reading stops at end of input, on a
/// read error, or as soon as `keep_going` returns false.
pub fn feed_commands<R: BufRead>(
    reader: R,
    sketcher: &mut Sketcher,
    mut keep_going: impl FnMut() -> bool,
) -> FeedSummary {
    let mut summary = FeedSummary::default();

    for (number, bytes) in reader.split(b'\n').enumerate() {
        let bytes = match bytes {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Reading sketch input failed: {}", e);
                break;
            }
        };
        summary.lines += 1;

        let result = std::str::from_utf8(&bytes)
            .map_err(|e| e.to_string())
            .and_then(|line| {
                SketchCommand::parse_line(line)
                    .and_then(|cmd| match cmd {
                        Some(cmd) => cmd.apply(sketcher),
                        None => Ok(Vec::new()),
                    })
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(points) if !points.is_empty() => {
                summary.points += points.len();
                tracing::info!(
                    "Queued {} points ({} total)",
                    points.len(),
                    sketcher.log().len()
                );
            }
            Ok(_) => {}
            Err(e) => {
                summary.rejected += 1;
                tracing::warn!("Line {}: {}", number + 1, e);
            }
        }

        if !keep_going() {
            break;
        }
    }

    summary
}
