#![forbid(unsafe_code)]

//! Core: geometry primitives, sides, and the world/screen projection.
//!
//! # Role in tabkit
//! `tabkit-core` is the coordinate layer. Everything above it computes in
//! *world space*, a side-independent frame where x runs along the tab strip
//! and y runs from the strip's outer edge toward the page. This crate owns
//! the primitives of that frame and the projection that pins it onto a
//! concrete widget side.
//!
//! # Primary responsibilities
//! - **Rect/Sides**: integer-pixel rectangles and per-edge margins.
//! - **Side/Quadrant/Slant**: which edge the strip occupies, label rotation,
//!   and which tab ends are slanted.
//! - **Projection**: exact, invertible world-to-screen mapping for all four
//!   sides, plus the matching arrow-key direction remap.
//! - **Page placement**: anchor/fill arithmetic for the page cavity.
//!
//! # How it fits in the system
//! `tabkit-layout` packs tabs entirely in world space and never sees a
//! `Side`; `tabkit-widget` holds a `Projection` and converts at its own
//! boundary (hit queries inward, geometry answers outward).

pub mod geometry;
pub mod page;
pub mod side;
pub mod transform;
