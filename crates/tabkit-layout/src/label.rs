#![forbid(unsafe_code)]

//! Label geometry: icon, text, and close-button placement inside one tab.
//!
//! A label is up to three parts in a fixed left-to-right order. Absent
//! parts contribute no width and no gap. The text box is forced up to odd
//! dimensions before anything sums, so the dotted focus ring and underline
//! center on a whole pixel. Rotation happens last: the assembled box turns
//! as a unit, and [`rotate_rect_in_box`] maps any unrotated part rect into
//! the rotated box. The same routine serves drawing and hit-testing, so
//! the two cannot disagree.
//!
//! # Invariants
//!
//! - Gaps appear only between present parts (`count - 1` gaps).
//! - Odd-forcing applies to the text box only, never to icon or button.
//! - `rotated` equals `unrotated` transposed for sideways quadrants.
//! - Four applications of [`rotate_rect_in_box`] at R90 are the identity.

use tabkit_core::geometry::{Rect, Sides, Size};
use tabkit_core::side::Quadrant;

/// Gap between adjacent present label parts.
pub const PART_GAP: i32 = 2;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Measured part sizes for one label, before layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelParts {
    pub icon: Option<Size>,
    pub text: Option<Size>,
    pub button: Option<Size>,
}

/// Computed geometry for one label.
///
/// Part rects are in unrotated label space with origin at the label's
/// top-left; map them through [`rotate_rect_in_box`] with `unrotated` as
/// the bounds to get rotated positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelGeometry {
    /// Text part size after odd-forcing.
    pub text_box: Size,
    /// Assembled label size before rotation.
    pub unrotated: Size,
    /// Assembled label size after quadrant rotation.
    pub rotated: Size,
    /// Icon rect in unrotated label space.
    pub icon: Option<Rect>,
    /// Text rect in unrotated label space.
    pub text: Option<Rect>,
    /// Close-button rect in unrotated label space.
    pub button: Option<Rect>,
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Force a dimension up to the next odd value.
const fn force_odd(n: i32) -> i32 {
    n | 1
}

/// Assemble a label from its measured parts.
///
/// Parts lay out left to right with [`PART_GAP`] between present
/// neighbors, each vertically centered in the tallest part's height.
/// `ipad` is interior padding around the assembled parts.
#[must_use]
pub fn layout_label(parts: LabelParts, ipad: Sides, quadrant: Quadrant) -> LabelGeometry {
    let text_box = match parts.text {
        Some(t) => Size::new(force_odd(t.width), force_odd(t.height)),
        None => Size::default(),
    };

    let present: [Option<Size>; 3] = [parts.icon, parts.text.map(|_| text_box), parts.button];

    let mut inner_width = 0;
    let mut inner_height = 0;
    let mut count = 0;
    for part in present.iter().flatten() {
        inner_width += part.width;
        inner_height = inner_height.max(part.height);
        count += 1;
    }
    if count > 1 {
        inner_width += PART_GAP * (count - 1);
    }

    let unrotated = Size::new(
        inner_width + ipad.horizontal_sum(),
        inner_height + ipad.vertical_sum(),
    );

    // Place parts, each vertically centered.
    let mut x = ipad.left;
    let mut rects: [Option<Rect>; 3] = [None; 3];
    for (slot, part) in rects.iter_mut().zip(present) {
        if let Some(size) = part {
            let y = ipad.top + (inner_height - size.height) / 2;
            *slot = Some(Rect::new(x, y, size.width, size.height));
            x += size.width + PART_GAP;
        }
    }

    let rotated = if quadrant.is_sideways() {
        unrotated.transposed()
    } else {
        unrotated
    };

    LabelGeometry {
        text_box,
        unrotated,
        rotated,
        icon: rects[0],
        text: rects[1],
        button: rects[2],
    }
}

/// Rotate `rect` inside a box of size `bounds` by the given quadrant.
///
/// `bounds` is the unrotated box; the result lands in the rotated box
/// (transposed bounds for sideways quadrants). This is the one rotation
/// routine in the crate; label assembly and sub-part hit-testing both go
/// through it.
#[must_use]
pub const fn rotate_rect_in_box(rect: Rect, bounds: Size, quadrant: Quadrant) -> Rect {
    match quadrant {
        Quadrant::R0 => rect,
        Quadrant::R90 => Rect::new(
            bounds.height - rect.y - rect.height,
            rect.x,
            rect.height,
            rect.width,
        ),
        Quadrant::R180 => Rect::new(
            bounds.width - rect.x - rect.width,
            bounds.height - rect.y - rect.height,
            rect.width,
            rect.height,
        ),
        Quadrant::R270 => Rect::new(
            rect.y,
            bounds.width - rect.x - rect.width,
            rect.height,
            rect.width,
        ),
    }
}
