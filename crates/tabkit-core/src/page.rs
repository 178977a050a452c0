#![forbid(unsafe_code)]

//! Page placement inside the cavity.
//!
//! The widget carves a page cavity out of whatever the strip does not use;
//! hosts then place the selected page's window in it. [`page_rect`] does
//! that placement: padding first, then fill per axis, then anchor for any
//! leftover space.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::geometry::{Rect, Sides};
use crate::side::ParseKeywordError;

// ---------------------------------------------------------------------------
// Anchor
// ---------------------------------------------------------------------------

/// Compass anchor for the page when it does not fill the cavity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Center,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

/// Placement along one axis.
#[derive(Clone, Copy)]
enum Lean {
    Start,
    Center,
    End,
}

impl Lean {
    fn offset(self, slack: i32) -> i32 {
        match self {
            Lean::Start => 0,
            Lean::Center => slack / 2,
            Lean::End => slack,
        }
    }
}

impl Anchor {
    /// Horizontal and vertical lean for this anchor.
    fn leans(self) -> (Lean, Lean) {
        match self {
            Anchor::Nw => (Lean::Start, Lean::Start),
            Anchor::N => (Lean::Center, Lean::Start),
            Anchor::Ne => (Lean::End, Lean::Start),
            Anchor::W => (Lean::Start, Lean::Center),
            Anchor::Center => (Lean::Center, Lean::Center),
            Anchor::E => (Lean::End, Lean::Center),
            Anchor::Sw => (Lean::Start, Lean::End),
            Anchor::S => (Lean::Center, Lean::End),
            Anchor::Se => (Lean::End, Lean::End),
        }
    }

    /// Configuration keyword for this anchor.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Anchor::Center => "center",
            Anchor::N => "n",
            Anchor::Ne => "ne",
            Anchor::E => "e",
            Anchor::Se => "se",
            Anchor::S => "s",
            Anchor::Sw => "sw",
            Anchor::W => "w",
            Anchor::Nw => "nw",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Anchor {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(Anchor::Center),
            "n" => Ok(Anchor::N),
            "ne" => Ok(Anchor::Ne),
            "e" => Ok(Anchor::E),
            "se" => Ok(Anchor::Se),
            "s" => Ok(Anchor::S),
            "sw" => Ok(Anchor::Sw),
            "w" => Ok(Anchor::W),
            "nw" => Ok(Anchor::Nw),
            other => Err(ParseKeywordError::new("anchor", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Fill
// ---------------------------------------------------------------------------

bitflags! {
    /// Which axes the page stretches to fill the cavity.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Fill: u8 {
        const NONE = 0b00;
        const X    = 0b01;
        const Y    = 0b10;
        const BOTH = Self::X.bits() | Self::Y.bits();
    }
}

impl Default for Fill {
    fn default() -> Self {
        Fill::BOTH
    }
}

impl Fill {
    /// Configuration keyword for this fill.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match (self.contains(Fill::X), self.contains(Fill::Y)) {
            (false, false) => "none",
            (true, false) => "x",
            (false, true) => "y",
            (true, true) => "both",
        }
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Fill {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Fill::NONE),
            "x" => Ok(Fill::X),
            "y" => Ok(Fill::Y),
            "both" => Ok(Fill::BOTH),
            other => Err(ParseKeywordError::new("fill", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Place a page of the given natural size inside `cavity`.
///
/// Padding shrinks the cavity first. On each axis the page takes the full
/// padded extent when the matching `fill` flag is set, otherwise its
/// natural size clamped to the extent; `anchor` positions any leftover.
#[must_use]
pub fn page_rect(
    cavity: Rect,
    natural_width: i32,
    natural_height: i32,
    anchor: Anchor,
    fill: Fill,
    padding: Sides,
) -> Rect {
    let inner = cavity.inner(padding);
    let width = if fill.contains(Fill::X) {
        inner.width
    } else {
        natural_width.clamp(0, inner.width)
    };
    let height = if fill.contains(Fill::Y) {
        inner.height
    } else {
        natural_height.clamp(0, inner.height)
    };

    let (h_lean, v_lean) = anchor.leans();
    let x = inner.x + h_lean.offset(inner.width - width);
    let y = inner.y + v_lean.offset(inner.height - height);
    Rect::new(x, y, width, height)
}
