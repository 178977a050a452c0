#![forbid(unsafe_code)]

//! Hit-testing and directional navigation over the packed strip.
//!
//! Both run in world space: the screen point (or probe) maps through the
//! tabset's [`Projection`](tabkit_core::transform::Projection) once, then
//! plain rectangle tests decide the outcome. The selected tab's tear-off
//! band beats its label; the close button is a sub-rectangle of the
//! label box; everything else is [`PickContext::Label`].

use tabkit_core::geometry::Rect;
use tabkit_core::transform::Direction;
use tabkit_layout::rotate_rect_in_box;

use crate::tab::TabId;
use crate::tabset::Tabset;

/// World-space depth of the tear-off band along the tab's page edge.
pub const PERFORATION_SIZE: i32 = 6;

/// What part of a tab a screen point landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickContext {
    /// The tab body or label.
    Label,
    /// The tear-off band of the selected tab.
    Perforation,
    /// The close button inside the label.
    CloseButton,
}

impl Tabset {
    /// Hit-test a screen point against the strip.
    ///
    /// Returns the first on-screen tab in display order whose world
    /// rectangle contains the point, or `None` over gaps, the page, or a
    /// hidden strip.
    #[must_use]
    pub fn pick(&self, x: i32, y: i32) -> Option<(TabId, PickContext)> {
        if !self.strip_visible() {
            return None;
        }
        let (wx, wy) = self.projection().to_world(x, y);

        if self.options.tearoff()
            && let Some(selected) = self.selected
            && let Some(tab) = self.arena.get(&selected)
            && tab.on_screen
            && !tab.torn_off
            && let Some(r) = self.world_rect(selected)
        {
            let depth = PERFORATION_SIZE.min(r.height);
            let band = Rect::new(r.x, r.bottom() - depth, r.width, depth);
            if band.contains(wx, wy) {
                return Some((selected, PickContext::Perforation));
            }
        }

        for id in &self.order {
            let Some(tab) = self.arena.get(id) else {
                continue;
            };
            if !tab.on_screen {
                continue;
            }
            let Some(r) = self.world_rect(*id) else {
                continue;
            };
            if !r.contains(wx, wy) {
                continue;
            }
            if self.options.close_buttons()
                && !tab.is_plus()
                && let Some(geometry) = tab.label
                && let Some(button) = geometry.button
            {
                // The label box is centered in the tab; rotate the button
                // into rotated-label space, then translate into the tab.
                let rotated =
                    rotate_rect_in_box(button, geometry.unrotated, self.options.quadrant());
                let button_world = rotated.translated(
                    r.x + (r.width - geometry.rotated.width) / 2,
                    r.y + (r.height - geometry.rotated.height) / 2,
                );
                if button_world.contains(wx, wy) {
                    return Some((*id, PickContext::CloseButton));
                }
            }
            return Some((*id, PickContext::Label));
        }
        None
    }

    /// Step the focus from a tab in a screen direction.
    ///
    /// Probes just past the tab's edge, then one gap of jitter further,
    /// then a whole tab or tier further; the first probe landing on a
    /// different tab wins. All misses keep the focus where it was.
    #[must_use]
    pub fn navigate(&self, direction: Direction, from: TabId) -> TabId {
        let Some(r) = self.world_rect(from) else {
            return from;
        };
        let world_dir = direction.to_world(self.options.side());
        let (dx, dy, half, step) = match world_dir {
            Direction::Left => (-1, 0, r.width / 2, self.layout.max_tab_width),
            Direction::Right => (1, 0, r.width / 2, self.layout.max_tab_width),
            Direction::Up => (0, -1, r.height / 2, self.layout.tab_height),
            Direction::Down => (0, 1, r.height / 2, self.layout.tab_height),
        };
        let jitter = (self.options.gap() - self.options.overlap()).max(1);
        let proj = self.projection();
        let (cx, cy) = (r.center_x(), r.center_y());
        for dist in [half + 1, half + jitter + 1, half + step.max(1)] {
            let (sx, sy) = proj.to_screen(cx + dx * dist, cy + dy * dist);
            if let Some((id, _)) = self.pick(sx, sy)
                && id != from
            {
                return id;
            }
        }
        from
    }
}
