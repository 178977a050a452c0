#![forbid(unsafe_code)]

//! World/screen projection for the four widget sides.
//!
//! Tab layout happens once, in *world space*: x runs along the strip in
//! display order, y runs from the strip's outer edge toward the page.
//! [`Projection`] pins that frame onto a concrete widget side. Points and
//! rectangles convert in both directions; arrow-key directions convert
//! with [`Direction::to_world`].
//!
//! Mirrored sides flip one axis. Points mirror as `extent - v - 1` (pixel
//! mirror) while rect edges mirror as `extent - v`; the two agree because
//! rect right/bottom edges are exclusive.
//!
//! # Invariants
//!
//! - `to_world(to_screen(p)) == p` for every point and every side.
//! - `rect_to_screen` maps a world rect onto exactly the screen pixels its
//!   world pixels map to.
//! - `Direction::to_world` is the inverse of the projection's action on
//!   directions: probing in the returned world direction moves the mapped
//!   point the way the pressed arrow points on screen.

use crate::geometry::Rect;
use crate::side::Side;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// A screen-space arrow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a screen arrow to the world direction it points at for `side`.
    ///
    /// The caller probes tab geometry in world space; this returns the
    /// direction to probe so the result moves the way the user pressed.
    #[must_use]
    pub const fn to_world(self, side: Side) -> Direction {
        match side {
            Side::Top => self,
            Side::Bottom => match self {
                Direction::Up => Direction::Down,
                Direction::Down => Direction::Up,
                other => other,
            },
            Side::Left => match self {
                Direction::Up => Direction::Left,
                Direction::Down => Direction::Right,
                Direction::Left => Direction::Up,
                Direction::Right => Direction::Down,
            },
            Side::Right => match self {
                Direction::Up => Direction::Left,
                Direction::Down => Direction::Right,
                Direction::Left => Direction::Down,
                Direction::Right => Direction::Up,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// World-to-screen mapping for one widget.
///
/// `container` is the widget's screen rectangle; its width/height choose the
/// mirror extents for the bottom and right sides. `x_offset`/`y_offset`
/// translate world coordinates before the side mapping: x_offset carries
/// inset, selected-tab padding, and scroll along the strip, y_offset carries
/// the inset from the strip's outer edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub side: Side,
    pub container: Rect,
    pub x_offset: i32,
    pub y_offset: i32,
}

impl Projection {
    /// Projection with zero offsets.
    #[must_use]
    pub const fn new(side: Side, container: Rect) -> Self {
        Self {
            side,
            container,
            x_offset: 0,
            y_offset: 0,
        }
    }

    /// Set the world translation applied before the side mapping.
    #[must_use]
    pub const fn with_offsets(mut self, x_offset: i32, y_offset: i32) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self
    }

    /// Map a world point to its screen pixel.
    #[must_use]
    pub const fn to_screen(&self, x: i32, y: i32) -> (i32, i32) {
        let wx = x + self.x_offset;
        let wy = y + self.y_offset;
        let (sx, sy) = match self.side {
            Side::Top => (wx, wy),
            Side::Bottom => (wx, self.container.height - wy - 1),
            Side::Left => (wy, wx),
            Side::Right => (self.container.width - wy - 1, wx),
        };
        (self.container.x + sx, self.container.y + sy)
    }

    /// Map a screen pixel back to its world point. Exact inverse of
    /// [`to_screen`](Self::to_screen).
    #[must_use]
    pub const fn to_world(&self, x: i32, y: i32) -> (i32, i32) {
        let sx = x - self.container.x;
        let sy = y - self.container.y;
        let (wx, wy) = match self.side {
            Side::Top => (sx, sy),
            Side::Bottom => (sx, self.container.height - sy - 1),
            Side::Left => (sy, sx),
            Side::Right => (sy, self.container.width - sx - 1),
        };
        (wx - self.x_offset, wy - self.y_offset)
    }

    /// Map a world rectangle to its screen rectangle.
    ///
    /// The result covers exactly the screen pixels the rect's world pixels
    /// map to; mirrored sides flip which corner becomes the origin and
    /// sideways sides swap width and height.
    #[must_use]
    pub const fn rect_to_screen(&self, r: Rect) -> Rect {
        let x = r.x + self.x_offset;
        let y = r.y + self.y_offset;
        let (sx, sy, width, height) = match self.side {
            Side::Top => (x, y, r.width, r.height),
            Side::Bottom => (
                x,
                self.container.height - y - r.height,
                r.width,
                r.height,
            ),
            Side::Left => (y, x, r.height, r.width),
            Side::Right => (
                self.container.width - y - r.height,
                x,
                r.height,
                r.width,
            ),
        };
        Rect::new(self.container.x + sx, self.container.y + sy, width, height)
    }
}
