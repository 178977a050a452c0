#![forbid(unsafe_code)]

//! Slack distribution: growing and shrinking tabs to fit a tier.
//!
//! Two strategies. [`distribute_fair`] hands out (or takes back) space in
//! repeated equal rations; [`shrink_ranked`] takes from the widest tabs
//! first, lowering them level by level, and only rations once the final
//! level is found. Both mutate `width` only; callers reflow x positions
//! afterwards with [`reflow_positions`] so widths and positions never
//! desynchronize.
//!
//! # Invariants
//!
//! - Widths never drop below 1.
//! - Non-adjustable tabs (the plus tab) are never touched.
//! - Conservation: the sum of applied width changes equals the requested
//!   delta minus the returned residual.
//! - Termination: every pass either applies at least one pixel or ends
//!   the loop.

use crate::pack::TabLayout;

/// Distribute `delta` pixels across the adjustable tabs in fair rations.
///
/// Positive `delta` grows, negative shrinks. Each pass computes
/// `ration = remaining / count` truncated toward zero (deliberately
/// under-distributing), floored to magnitude 1 so small remainders still
/// move. Shrinking clamps each width at 1. Returns the undistributed
/// residual, zero unless every adjustable tab hit the floor.
#[must_use]
pub fn distribute_fair(tabs: &mut [TabLayout], adjustable: &[usize], delta: i32) -> i32 {
    let mut remaining = delta;
    if adjustable.is_empty() {
        return remaining;
    }
    while remaining != 0 {
        let mut ration = remaining / adjustable.len() as i32;
        if ration == 0 {
            ration = remaining.signum();
        }
        let mut progressed = false;
        for &idx in adjustable {
            if remaining == 0 {
                break;
            }
            let applied = if ration > 0 {
                ration.min(remaining)
            } else {
                ration.max(remaining).max(1 - tabs[idx].width)
            };
            if applied != 0 {
                tabs[idx].width += applied;
                remaining -= applied;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    remaining
}

/// Recover `deficit` pixels, widest tabs first.
///
/// Tabs are ranked by width descending (ties keep display order). The
/// widest rank is lowered to the next rank's width, then the two together
/// to the third's, and so on, until the remaining requirement fits within
/// one more level; that last slice is taken with [`distribute_fair`] over
/// the leveled tabs. An all-equal list levels nothing and rations across
/// every adjustable tab. Returns the unrecovered deficit (floor of 1 on
/// every width).
#[must_use]
pub fn shrink_ranked(tabs: &mut [TabLayout], adjustable: &[usize], deficit: i32) -> i32 {
    if deficit <= 0 || adjustable.is_empty() {
        return deficit.max(0);
    }
    let mut order: Vec<usize> = adjustable.to_vec();
    order.sort_by_key(|&idx| std::cmp::Reverse(tabs[idx].width));

    let mut remaining = deficit;
    let mut leveled = 1;
    while leveled < order.len() {
        let level = tabs[order[leveled]].width;
        let mut recoverable = 0;
        for &idx in &order[..leveled] {
            recoverable += tabs[idx].width - level;
        }
        if recoverable >= remaining {
            break;
        }
        for &idx in &order[..leveled] {
            remaining -= tabs[idx].width - level;
            tabs[idx].width = level;
        }
        leveled += 1;
    }
    -distribute_fair(tabs, &order[..leveled], -remaining)
}

/// Rebuild x positions from widths, cumulative from 0.
///
/// `spacing` is `gap - overlap` and may be negative. Call after every
/// width adjustment; a tier's positions are a pure function of its
/// widths.
pub fn reflow_positions(tabs: &mut [TabLayout], spacing: i32) {
    let mut x = 0;
    for tab in tabs {
        tab.x = x;
        x += tab.width + spacing;
    }
}
