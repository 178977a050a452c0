#![forbid(unsafe_code)]

//! Tabset configuration.
//!
//! [`TabsetOptions`] collects every knob that shapes the strip: side,
//! slant, width policy, tier count, spacing, padding, and the feature
//! toggles. Fields are private; the typed setters validate and keep the
//! prior value on rejection, and [`TabsetOptions::set`] accepts the
//! string keywords hosts expose in their configuration surface.
//!
//! # Failure Modes
//!
//! - Every rejected value comes back as
//!   [`TabsetError::InvalidOption`] naming the option; the options
//!   struct is untouched.

use std::str::FromStr;

use tabkit_core::geometry::Sides;
use tabkit_core::side::{ParseKeywordError, Quadrant, Side, Slant};
use tabkit_layout::WidthPolicy;

use crate::error::TabsetError;

// ---------------------------------------------------------------------------
// Strip visibility
// ---------------------------------------------------------------------------

/// When the tab strip is drawn at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowTabs {
    /// Always show the strip, even with zero or one tab.
    #[default]
    Always,
    /// Never show the strip; pages switch programmatically.
    Never,
    /// Show the strip only once there are at least two tabs.
    Multiple,
}

impl ShowTabs {
    /// Configuration keyword for this mode.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            ShowTabs::Always => "always",
            ShowTabs::Never => "never",
            ShowTabs::Multiple => "multiple",
        }
    }
}

impl std::fmt::Display for ShowTabs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ShowTabs {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(ShowTabs::Always),
            "never" => Ok(ShowTabs::Never),
            "multiple" => Ok(ShowTabs::Multiple),
            other => Err(ParseKeywordError::new("show-tabs", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Every configuration knob of one tabset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabsetOptions {
    side: Side,
    slant: Slant,
    width_policy: WidthPolicy,
    tiers: usize,
    gap: i32,
    overlap: i32,
    select_pad: (i32, i32),
    label_pad: Sides,
    inset: i32,
    angle: i32,
    scroll_increment: i32,
    show_tabs: ShowTabs,
    tearoff: bool,
    close_buttons: bool,
}

impl Default for TabsetOptions {
    fn default() -> Self {
        Self {
            side: Side::Top,
            slant: Slant::NONE,
            width_policy: WidthPolicy::Variable,
            tiers: 1,
            gap: 2,
            overlap: 0,
            select_pad: (2, 2),
            label_pad: Sides::from((2, 4)),
            inset: 2,
            angle: 0,
            scroll_increment: 24,
            show_tabs: ShowTabs::Always,
            tearoff: false,
            close_buttons: false,
        }
    }
}

impl TabsetOptions {
    // --- getters ---

    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub const fn slant(&self) -> Slant {
        self.slant
    }

    #[must_use]
    pub const fn width_policy(&self) -> WidthPolicy {
        self.width_policy
    }

    /// Requested tier count; the packer may use fewer.
    #[must_use]
    pub const fn tiers(&self) -> usize {
        self.tiers
    }

    #[must_use]
    pub const fn gap(&self) -> i32 {
        self.gap
    }

    #[must_use]
    pub const fn overlap(&self) -> i32 {
        self.overlap
    }

    /// Extra room reserved so the selected tab can stand proud, as
    /// (per-side x, y) pixels.
    #[must_use]
    pub const fn select_pad(&self) -> (i32, i32) {
        self.select_pad
    }

    /// Padding between the tab outline and its label parts.
    #[must_use]
    pub const fn label_pad(&self) -> Sides {
        self.label_pad
    }

    /// Margin between the widget edge and the strip.
    #[must_use]
    pub const fn inset(&self) -> i32 {
        self.inset
    }

    /// Raw configured label angle in degrees.
    #[must_use]
    pub const fn angle(&self) -> i32 {
        self.angle
    }

    /// The configured angle snapped to a quarter turn.
    #[must_use]
    pub const fn quadrant(&self) -> Quadrant {
        Quadrant::from_angle(self.angle)
    }

    /// Pixels one scroll step moves an overfull strip.
    #[must_use]
    pub const fn scroll_increment(&self) -> i32 {
        self.scroll_increment
    }

    #[must_use]
    pub const fn show_tabs(&self) -> ShowTabs {
        self.show_tabs
    }

    /// Whether the selected tab exposes a tear-off perforation.
    #[must_use]
    pub const fn tearoff(&self) -> bool {
        self.tearoff
    }

    /// Whether labels carry a close button.
    #[must_use]
    pub const fn close_buttons(&self) -> bool {
        self.close_buttons
    }

    // --- typed setters ---

    pub fn set_side(&mut self, side: Side) {
        self.side = side;
    }

    pub fn set_slant(&mut self, slant: Slant) {
        self.slant = slant;
    }

    pub fn set_width_policy(&mut self, policy: WidthPolicy) -> Result<(), TabsetError> {
        if let WidthPolicy::Fixed(px) = policy
            && px < 0
        {
            return Err(invalid("width", format!("fixed width {px} is negative")));
        }
        self.width_policy = policy;
        Ok(())
    }

    pub fn set_tiers(&mut self, tiers: usize) {
        self.tiers = tiers;
    }

    pub fn set_gap(&mut self, gap: i32) -> Result<(), TabsetError> {
        self.gap = non_negative("gap", gap)?;
        Ok(())
    }

    pub fn set_overlap(&mut self, overlap: i32) -> Result<(), TabsetError> {
        self.overlap = non_negative("overlap", overlap)?;
        Ok(())
    }

    pub fn set_select_pad(&mut self, x: i32, y: i32) -> Result<(), TabsetError> {
        self.select_pad = (non_negative("select-pad", x)?, non_negative("select-pad", y)?);
        Ok(())
    }

    pub fn set_label_pad(&mut self, pad: Sides) -> Result<(), TabsetError> {
        for v in [pad.top, pad.bottom, pad.left, pad.right] {
            non_negative("label-pad", v)?;
        }
        self.label_pad = pad;
        Ok(())
    }

    pub fn set_inset(&mut self, inset: i32) -> Result<(), TabsetError> {
        self.inset = non_negative("inset", inset)?;
        Ok(())
    }

    /// Any integer angle is accepted; layout snaps it to a quadrant.
    pub fn set_angle(&mut self, degrees: i32) {
        self.angle = degrees;
    }

    pub fn set_scroll_increment(&mut self, px: i32) -> Result<(), TabsetError> {
        self.scroll_increment = non_negative("scroll-increment", px)?;
        Ok(())
    }

    pub fn set_show_tabs(&mut self, mode: ShowTabs) {
        self.show_tabs = mode;
    }

    pub fn set_tearoff(&mut self, on: bool) {
        self.tearoff = on;
    }

    pub fn set_close_buttons(&mut self, on: bool) {
        self.close_buttons = on;
    }

    // --- string configuration ---

    /// Apply one `option = value` pair from a host configuration surface.
    ///
    /// Recognized options: `side`, `slant`, `width`, `tiers`, `gap`,
    /// `overlap`, `inset`, `angle`, `scroll-increment`, `show-tabs`,
    /// `tearoff`, `close-buttons`, and `select-pad` (either a single
    /// value or `x,y`).
    pub fn set(&mut self, option: &str, value: &str) -> Result<(), TabsetError> {
        match option {
            "side" => self.side = parse_keyword(option, value)?,
            "slant" => self.slant = parse_keyword(option, value)?,
            "width" => {
                let policy: WidthPolicy = parse_keyword(option, value)?;
                self.set_width_policy(policy)?;
            }
            "tiers" => self.tiers = parse_int(option, value)?,
            "gap" => self.set_gap(parse_int(option, value)?)?,
            "overlap" => self.set_overlap(parse_int(option, value)?)?,
            "inset" => self.set_inset(parse_int(option, value)?)?,
            "angle" => self.angle = parse_int(option, value)?,
            "scroll-increment" => self.set_scroll_increment(parse_int(option, value)?)?,
            "show-tabs" => self.show_tabs = parse_keyword(option, value)?,
            "tearoff" => self.tearoff = parse_bool(option, value)?,
            "close-buttons" => self.close_buttons = parse_bool(option, value)?,
            "select-pad" => match value.split_once(',') {
                Some((x, y)) => {
                    self.set_select_pad(parse_int(option, x.trim())?, parse_int(option, y.trim())?)?;
                }
                None => {
                    let v = parse_int(option, value)?;
                    self.set_select_pad(v, v)?;
                }
            },
            other => {
                return Err(invalid(other, "unknown option".to_string()));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Parse helpers
// ---------------------------------------------------------------------------

fn invalid(option: &str, reason: String) -> TabsetError {
    TabsetError::InvalidOption {
        option: option.to_string(),
        reason,
    }
}

fn non_negative(option: &str, value: i32) -> Result<i32, TabsetError> {
    if value < 0 {
        return Err(invalid(option, format!("{value} is negative")));
    }
    Ok(value)
}

fn parse_keyword<T>(option: &str, value: &str) -> Result<T, TabsetError>
where
    T: FromStr<Err = ParseKeywordError>,
{
    value.parse().map_err(|e: ParseKeywordError| invalid(option, e.to_string()))
}

fn parse_int<T: FromStr>(option: &str, value: &str) -> Result<T, TabsetError> {
    value
        .parse()
        .map_err(|_| invalid(option, format!("{value:?} is not a number")))
}

fn parse_bool(option: &str, value: &str) -> Result<bool, TabsetError> {
    match value {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => Err(invalid(option, format!("{other:?} is not a boolean"))),
    }
}
