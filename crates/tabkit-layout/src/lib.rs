#![forbid(unsafe_code)]

//! Layout solvers for the tab strip.
//!
//! Everything here computes in world space (see `tabkit-core`): a label
//! geometry pass per tab, then a packing pass over all tabs. The packer
//! produces an immutable [`Layout`] value the widget keeps between passes;
//! nothing in this crate mutates a layout after it is returned.
//!
//! Pipeline: measure parts → [`layout_label`] → [`pack`] (tiering + slack
//! distribution) → [`renumber`] around the selected tab.

pub use tabkit_core::geometry::{Rect, Sides, Size};

pub mod label;
pub mod pack;
pub mod slack;
pub mod tier;

pub use label::{LabelGeometry, LabelParts, PART_GAP, layout_label, rotate_rect_in_box};
pub use pack::{
    CORNER_INSET, Layout, LayoutFlags, LayoutSnapshot, PackInput, TabLayout, TabRecord, TabSlot,
    WidthPolicy, pack,
};
pub use slack::{distribute_fair, reflow_positions, shrink_ranked};
pub use tier::renumber;
