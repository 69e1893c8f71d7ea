//! Docking window layout.
//!
//! The manager keeps an ordered list of registered windows. Each window's
//! requested size decides where it docks:
//! * `(0, 0)`: the primary window, always first;
//! * `(w, 0)`: a side window of width `w`, right of the primary;
//! * `(0, h)`: a bottom window of height `h`, below everything else.
//!
//! Invariants (after every successful `reorg`):
//! * the rects of visible windows tile `bounds` with no gaps or overlap
//!   (side and bottom requests larger than the bounds are clipped, so a
//!   window may end up with an empty rect);
//! * hidden windows keep their registration order and get an empty rect.

use std::collections::HashSet;

use core_render::{DockedWindow, WindowId};
use core_text::{Point, Rect};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("window {id:?} requests neither a width nor a height to dock with")]
    NoDockingDimension { id: WindowId },
    #[error("the primary window cannot be hidden")]
    PrimaryHidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dock {
    Primary,
    Side(i32),
    Bottom(i32),
}

fn dock_of(requested: Point) -> Option<Dock> {
    match (requested.x > 0, requested.y > 0) {
        (false, false) => Some(Dock::Primary),
        (true, false) => Some(Dock::Side(requested.x)),
        (false, true) => Some(Dock::Bottom(requested.y)),
        (true, true) => None,
    }
}

#[derive(Debug, Clone)]
struct Entry {
    id: WindowId,
    requested: Point,
    rect: Rect,
}

#[derive(Debug, Clone, Default)]
pub struct WindowManager {
    bounds: Rect,
    entries: Vec<Entry>,
    hidden: HashSet<WindowId>,
}

impl WindowManager {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn is_hidden(&self, id: WindowId) -> bool {
        self.hidden.contains(&id)
    }

    /// Register a window. Re-adding a registered id is a no-op. A request
    /// that cannot dock leaves the manager unchanged.
    pub fn add_window(&mut self, id: WindowId, requested: Point) -> Result<(), LayoutError> {
        if self.contains(id) {
            return Ok(());
        }
        let dock = dock_of(requested);
        if dock.is_none() || (dock == Some(Dock::Primary) && self.has_primary()) {
            error!(target: "model.layout", ?id, ?requested, "window_rejected");
            return Err(LayoutError::NoDockingDimension { id });
        }
        let entry = Entry {
            id,
            requested,
            rect: Rect::default(),
        };
        match dock {
            Some(Dock::Primary) => self.entries.insert(0, entry),
            Some(Dock::Side(_)) => {
                let at = usize::from(self.has_primary()).min(self.entries.len());
                self.entries.insert(at, entry);
            }
            _ => self.entries.push(entry),
        }
        debug!(target: "model.layout", ?id, ?requested, "window_added");
        self.reorg()
    }

    pub fn remove_window(&mut self, id: WindowId) -> Result<(), LayoutError> {
        self.entries.retain(|e| e.id != id);
        self.hidden.remove(&id);
        self.reorg()
    }

    pub fn hide_window(&mut self, id: WindowId) -> Result<(), LayoutError> {
        if let Some(e) = self.entries.iter().find(|e| e.id == id)
            && dock_of(e.requested) == Some(Dock::Primary)
        {
            error!(target: "model.layout", ?id, "primary_hide_rejected");
            return Err(LayoutError::PrimaryHidden);
        }
        self.hidden.insert(id);
        self.reorg()
    }

    pub fn show_window(&mut self, id: WindowId) -> Result<(), LayoutError> {
        self.hidden.remove(&id);
        self.reorg()
    }

    /// New bounding rectangle, e.g. after a terminal resize.
    pub fn set_bounds(&mut self, bounds: Rect) -> Result<(), LayoutError> {
        self.bounds = bounds;
        self.reorg()
    }

    /// Computed rect of `id`; empty for hidden windows.
    pub fn rect(&self, id: WindowId) -> Option<Rect> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.rect)
    }

    /// `(id, rect)` of every registered window in docking order.
    pub fn layout(&self) -> Vec<(WindowId, Rect)> {
        self.entries.iter().map(|e| (e.id, e.rect)).collect()
    }

    /// Push the computed rects into the windows passed in.
    pub fn apply(&self, windows: &mut [&mut dyn DockedWindow]) {
        for w in windows.iter_mut() {
            if let Some(rect) = self.rect(w.window_id()) {
                w.set_rect(rect);
            }
        }
    }

    fn has_primary(&self) -> bool {
        self.entries
            .first()
            .is_some_and(|e| dock_of(e.requested) == Some(Dock::Primary))
    }

    /// Recompute every rect from the bounds and the visible requests.
    pub fn reorg(&mut self) -> Result<(), LayoutError> {
        let mut primaries = 0;
        let mut side_total = 0;
        let mut bottom_total = 0;
        for e in &self.entries {
            match dock_of(e.requested) {
                Some(Dock::Primary) => {
                    primaries += 1;
                    if primaries > 1 {
                        error!(target: "model.layout", id = ?e.id, "second_primary_window");
                        return Err(LayoutError::NoDockingDimension { id: e.id });
                    }
                }
                None => {
                    error!(target: "model.layout", id = ?e.id, requested = ?e.requested, "window_without_dock");
                    return Err(LayoutError::NoDockingDimension { id: e.id });
                }
                Some(_) if self.hidden.contains(&e.id) => {}
                Some(Dock::Side(w)) => side_total += w,
                Some(Dock::Bottom(h)) => bottom_total += h,
            }
        }

        let b = self.bounds.clamped();
        let main_width = (b.width() - side_total).max(0);
        let main_height = (b.height() - bottom_total).max(0);
        let mut x = b.pos.x + main_width;
        let mut y = b.pos.y + main_height;
        for e in &mut self.entries {
            let rect = if self.hidden.contains(&e.id) {
                Rect::from_parts(b.pos, Point::origin())
            } else {
                match dock_of(e.requested) {
                    Some(Dock::Primary) => Rect::from_parts(b.pos, Point::new(main_width, main_height)),
                    Some(Dock::Side(w)) => {
                        let r = Rect::new(x, b.pos.y, w, main_height);
                        x += w;
                        r
                    }
                    Some(Dock::Bottom(h)) => {
                        let r = Rect::new(b.pos.x, y, b.width(), h);
                        y += h;
                        r
                    }
                    None => Rect::default(),
                }
            };
            e.rect = rect.intersection(&b).clamped();
        }
        debug!(target: "model.layout", bounds = ?b, windows = self.entries.len(), "reorganized");
        Ok(())
    }
}
