#![forbid(unsafe_code)]

//! Text measurement boundary.
//!
//! Layout needs pixel extents for label text but the engine has no font
//! stack; hosts supply a [`TextMeasurer`] and the tabset treats its
//! answers as opaque sizes.

use tabkit_core::geometry::Size;
use unicode_width::UnicodeWidthStr;

/// Host-supplied text metrics.
///
/// `measure` returns the tight pixel box for a single line of text in
/// the label font. Implementations must be pure for the lifetime of one
/// layout pass: the tabset measures each label exactly once per pass.
pub trait TextMeasurer {
    fn measure(&self, text: &str) -> Size;
}

/// Fixed-cell measurer for terminals and tests.
///
/// Width is the display-column count of the text (wide glyphs count as
/// two columns) times the cell width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMeasurer {
    cell: Size,
}

impl MonospaceMeasurer {
    #[must_use]
    pub const fn new(cell_width: i32, cell_height: i32) -> Self {
        Self {
            cell: Size::new(cell_width, cell_height),
        }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str) -> Size {
        let columns = UnicodeWidthStr::width(text) as i32;
        Size::new(columns * self.cell.width, self.cell.height)
    }
}
