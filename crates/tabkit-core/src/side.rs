#![forbid(unsafe_code)]

//! Strip sides, label quadrants, and tab slants.
//!
//! These are the orientation knobs of the widget. [`Side`] picks the edge
//! the strip occupies, [`Quadrant`] is the label rotation snapped to a
//! quarter turn, and [`Slant`] says which tab ends are drawn slanted.
//! All three parse from the configuration keywords hosts expose.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

// ---------------------------------------------------------------------------
// Keyword errors
// ---------------------------------------------------------------------------

/// Error returned when a configuration keyword is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeywordError {
    /// The option family being parsed ("side", "slant", ...).
    pub what: &'static str,
    /// The rejected input.
    pub got: String,
}

impl ParseKeywordError {
    /// Record a rejected keyword for the given option family.
    pub fn new(what: &'static str, got: &str) -> Self {
        Self {
            what,
            got: got.to_string(),
        }
    }
}

impl fmt::Display for ParseKeywordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad {} keyword {:?}", self.what, self.got)
    }
}

impl std::error::Error for ParseKeywordError {}

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// The widget edge the tab strip occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Strip along the top edge, page below.
    #[default]
    Top,
    /// Strip along the bottom edge, page above.
    Bottom,
    /// Strip along the left edge, page to the right.
    Left,
    /// Strip along the right edge, page to the left.
    Right,
}

impl Side {
    /// True for [`Side::Top`] and [`Side::Bottom`].
    #[inline]
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }

    /// True for [`Side::Left`] and [`Side::Right`].
    #[inline]
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }

    /// Configuration keyword for this side.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Side {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(ParseKeywordError::new("side", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Quadrant
// ---------------------------------------------------------------------------

/// Label rotation snapped to a quarter turn.
///
/// Free-angle text rotation is out of scope; any configured angle snaps to
/// the nearest multiple of 90 degrees, counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quadrant {
    /// Upright.
    #[default]
    R0,
    /// Quarter turn counter-clockwise.
    R90,
    /// Upside down.
    R180,
    /// Three quarter turns counter-clockwise.
    R270,
}

impl Quadrant {
    /// Snap an angle in degrees to the nearest quarter turn.
    ///
    /// Accepts any integer angle; negatives and multiples of a full turn
    /// normalize first. Ties (45, 135, ...) round toward the next quadrant.
    #[must_use]
    pub const fn from_angle(degrees: i32) -> Self {
        let norm = degrees.rem_euclid(360);
        match ((norm + 45) / 90) % 4 {
            0 => Quadrant::R0,
            1 => Quadrant::R90,
            2 => Quadrant::R180,
            _ => Quadrant::R270,
        }
    }

    /// The snapped angle in degrees.
    #[inline]
    #[must_use]
    pub const fn degrees(self) -> i32 {
        match self {
            Quadrant::R0 => 0,
            Quadrant::R90 => 90,
            Quadrant::R180 => 180,
            Quadrant::R270 => 270,
        }
    }

    /// True when the rotation swaps width and height.
    #[inline]
    #[must_use]
    pub const fn is_sideways(self) -> bool {
        matches!(self, Quadrant::R90 | Quadrant::R270)
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

// ---------------------------------------------------------------------------
// Slant
// ---------------------------------------------------------------------------

bitflags! {
    /// Which ends of a tab outline are drawn slanted.
    ///
    /// A slanted end consumes extra strip width equal to the tab height;
    /// a square end only consumes the corner inset.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Slant: u8 {
        const NONE  = 0b00;
        const LEFT  = 0b01;
        const RIGHT = 0b10;
        const BOTH  = Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl Slant {
    /// Configuration keyword for this slant.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match (self.contains(Slant::LEFT), self.contains(Slant::RIGHT)) {
            (false, false) => "none",
            (true, false) => "left",
            (false, true) => "right",
            (true, true) => "both",
        }
    }
}

impl fmt::Display for Slant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Slant {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Slant::NONE),
            "left" => Ok(Slant::LEFT),
            "right" => Ok(Slant::RIGHT),
            "both" => Ok(Slant::BOTH),
            other => Err(ParseKeywordError::new("slant", other)),
        }
    }
}
