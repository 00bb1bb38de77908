//! Drawing instructions and their wire encoding
//!
//! A [`Coordinate`] is one instruction for the plotter. On the wire it is a
//! short ASCII frame:
//!
//! ```text
//! identifier "0x" HEX2(x) HEX2(y) HEX2(z)
//! ```
//!
//! e.g. `v0x0A140F` for a vector point at (10, 20) with z = 15. Each field is
//! two uppercase hex digits, so in-range values are `0..=255`. What happens to
//! values outside that envelope is decided by a [`RangePolicy`].

use crate::error::EncodeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal between the identifier and the hex payload
pub const HEX_PREFIX: &str = "0x";

/// Length of a frame whose fields are all in range
pub const FRAME_LEN: usize = 1 + HEX_PREFIX.len() + 6;

/// Largest value a field can carry in two hex digits
pub const FIELD_MAX: i32 = 0xFF;

/// Tag telling the device how to interpret `x, y, z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Identifier {
    /// Line endpoint; `z` is 1 for pen up / start and 0 for pen down / end
    Vector,
    /// Circle; `z` is the radius
    Circle,
}

impl Identifier {
    /// Wire character for this tag
    pub fn as_char(self) -> char {
        match self {
            Self::Vector => 'v',
            Self::Circle => 'c',
        }
    }

    /// Parse a wire character
    pub fn from_char(c: char) -> Result<Self, EncodeError> {
        match c {
            'v' => Ok(Self::Vector),
            'c' => Ok(Self::Circle),
            other => Err(EncodeError::UnknownIdentifier { identifier: other }),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// How to treat fields that do not fit in two hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Refuse to encode and report [`EncodeError::OutOfRange`]
    #[default]
    Reject,
    /// Clamp each field into `0..=255`
    Clamp,
    /// Legacy behaviour: hex of the 32-bit value, padded to at least two digits.
    /// Produces frames longer than [`FRAME_LEN`] for out-of-range values.
    Verbatim,
}

impl fmt::Display for RangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Clamp => write!(f, "clamp"),
            Self::Verbatim => write!(f, "verbatim"),
        }
    }
}

/// A single drawing instruction for the remote device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub identifier: Identifier,
}

impl Coordinate {
    /// Create a new coordinate
    pub fn new(x: i32, y: i32, z: i32, identifier: Identifier) -> Self {
        Self {
            x,
            y,
            z,
            identifier,
        }
    }

    /// Start of a line segment (pen up)
    pub fn vector_start(x: i32, y: i32) -> Self {
        Self::new(x, y, 1, Identifier::Vector)
    }

    /// End of a line segment (pen down)
    pub fn vector_end(x: i32, y: i32) -> Self {
        Self::new(x, y, 0, Identifier::Vector)
    }

    /// Circle centred at `(x, y)`
    pub fn circle(x: i32, y: i32, radius: i32) -> Self {
        Self::new(x, y, radius, Identifier::Circle)
    }

    /// Whether every field fits the two-digit envelope
    pub fn in_range(&self) -> bool {
        self.fields()
            .iter()
            .all(|(_, v)| (0..=FIELD_MAX).contains(v))
    }

    fn fields(&self) -> [(&'static str, i32); 3] {
        [("x", self.x), ("y", self.y), ("z", self.z)]
    }
}

/// Encode a coordinate whose fields are known to be in range.
///
/// Fields outside `0..=255` are rejected; use [`encode_with`] to choose a
/// different policy.
pub fn encode(c: &Coordinate) -> Result<String, EncodeError> {
    encode_with(c, RangePolicy::Reject)
}

/// Encode a coordinate, resolving out-of-range fields with `policy`
pub fn encode_with(c: &Coordinate, policy: RangePolicy) -> Result<String, EncodeError> {
    let mut frame = String::with_capacity(FRAME_LEN);
    frame.push(c.identifier.as_char());
    frame.push_str(HEX_PREFIX);

    for (field, value) in c.fields() {
        match policy {
            RangePolicy::Reject => {
                if !(0..=FIELD_MAX).contains(&value) {
                    return Err(EncodeError::OutOfRange { field, value });
                }
                frame.push_str(&format!("{:02X}", value));
            }
            RangePolicy::Clamp => {
                frame.push_str(&format!("{:02X}", value.clamp(0, FIELD_MAX)));
            }
            // i32 hex formatting is two's complement, matching deployed receivers
            RangePolicy::Verbatim => frame.push_str(&format!("{:02X}", value)),
        }
    }

    Ok(frame)
}

/// Decode a frame produced by [`encode`].
///
/// Only in-range frames of exactly [`FRAME_LEN`] characters are accepted.
pub fn decode(frame: &str) -> Result<Coordinate, EncodeError> {
    let malformed = |reason: &str| EncodeError::MalformedFrame {
        frame: frame.to_string(),
        reason: reason.to_string(),
    };

    if !frame.is_ascii() || frame.len() != FRAME_LEN {
        return Err(malformed("wrong length"));
    }

    let identifier = frame
        .chars()
        .next()
        .ok_or_else(|| malformed("empty"))
        .and_then(Identifier::from_char)?;

    if &frame[1..3] != HEX_PREFIX {
        return Err(malformed("missing 0x prefix"));
    }

    let mut values = [0i32; 3];
    for (i, slot) in values.iter_mut().enumerate() {
        let digits = &frame[3 + i * 2..5 + i * 2];
        if !digits
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        {
            return Err(malformed("expected uppercase hex digits"));
        }
        *slot = i32::from_str_radix(digits, 16).map_err(|_| malformed("bad hex digit"))?;
    }

    Ok(Coordinate::new(values[0], values[1], values[2], identifier))
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {}, {})", self.identifier, self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_padding() {
        let c = Coordinate::new(5, 0, 255, Identifier::Vector);
        assert_eq!(encode(&c).unwrap(), "v0x0500FF");
    }

    #[test]
    fn test_frame_example() {
        let c = Coordinate::new(10, 20, 15, Identifier::Vector);
        let frame = encode(&c).unwrap();
        assert_eq!(frame, "v0x0A140F");
        assert_eq!(frame.len(), FRAME_LEN);
    }

    #[test]
    fn test_circle_identifier() {
        let c = Coordinate::circle(100, 120, 40);
        assert_eq!(encode(&c).unwrap(), "c0x647828");
    }

    #[test]
    fn test_reject_out_of_range() {
        let c = Coordinate::new(256, 0, 0, Identifier::Vector);
        assert_eq!(
            encode(&c),
            Err(EncodeError::OutOfRange {
                field: "x",
                value: 256
            })
        );

        let c = Coordinate::new(0, 0, -1, Identifier::Circle);
        assert!(matches!(
            encode(&c),
            Err(EncodeError::OutOfRange { field: "z", .. })
        ));
    }

    #[test]
    fn test_clamp_policy() {
        let c = Coordinate::new(300, -20, 7, Identifier::Vector);
        assert_eq!(encode_with(&c, RangePolicy::Clamp).unwrap(), "v0xFF0007");
    }

    #[test]
    fn test_verbatim_policy_reproduces_overflow() {
        let c = Coordinate::new(0x1F4, 3, -1, Identifier::Vector);
        let frame = encode_with(&c, RangePolicy::Verbatim).unwrap();
        assert_eq!(frame, "v0x1F403FFFFFFFF");
        assert!(frame.len() > FRAME_LEN);
    }

    #[test]
    fn test_in_range() {
        assert!(Coordinate::new(0, 255, 1, Identifier::Vector).in_range());
        assert!(!Coordinate::new(0, 256, 1, Identifier::Vector).in_range());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("v0x0A14").is_err());
        assert!(decode("x0x0A140F").is_err());
        assert!(decode("v1x0A140F").is_err());
        assert!(decode("v0x0a140F").is_err());
        assert!(decode("v0xZZ140F").is_err());
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            decode("c0x647828").unwrap(),
            Coordinate::circle(100, 120, 40)
        );
    }
}
