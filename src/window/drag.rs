//! Title-bar dragging.
//!
//! A drag session exists only between a pointer-down on a title bar and
//! the next pointer-up. Pointer motion is consumed only while a session is
//! live; in `Idle` motion events fall through untouched.

use ratatui::prelude::Rect;

use super::{WindowId, WindowManager};
use crate::constants::MIN_FLOATING_VISIBLE_MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDrag {
    pub id: WindowId,
    /// Pointer minus window origin, captured once at pointer-down.
    pub offset_x: i32,
    pub offset_y: i32,
    /// Window origin at pointer-down, restored when the drag is aborted.
    pub origin_x: i32,
    pub origin_y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(HeaderDrag),
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
    clamp_bounds: Option<Rect>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn dragging(&self) -> Option<WindowId> {
        match self.state {
            DragState::Dragging(drag) => Some(drag.id),
            DragState::Idle => None,
        }
    }

    /// Keep dragged windows partially inside `bounds` (`None` disables
    /// clamping, which is the default).
    pub fn set_clamp_bounds(&mut self, bounds: Option<Rect>) {
        self.clamp_bounds = bounds;
    }

    /// Starts a drag on the title bar of `id`.
    ///
    /// Refused for unknown and maximized windows. Returns whether a drag
    /// session started.
    pub fn pointer_down(&mut self, wm: &WindowManager, id: WindowId, x: i32, y: i32) -> bool {
        let Some(window) = wm.window(id) else {
            return false;
        };
        if window.is_maximized() {
            return false;
        }
        let (origin_x, origin_y) = window.position();
        self.state = DragState::Dragging(HeaderDrag {
            id,
            offset_x: x - origin_x,
            offset_y: y - origin_y,
            origin_x,
            origin_y,
        });
        tracing::debug!(window_id = %id, x, y, "drag started");
        true
    }

    /// Repositions the dragged window under the pointer. Returns whether
    /// the event was consumed by an active drag.
    pub fn pointer_move(&mut self, wm: &mut WindowManager, x: i32, y: i32) -> bool {
        let DragState::Dragging(drag) = self.state else {
            return false;
        };
        let (mut next_x, mut next_y) = (x - drag.offset_x, y - drag.offset_y);
        if let Some(bounds) = self.clamp_bounds
            && let Some(window) = wm.window(drag.id)
        {
            (next_x, next_y) = clamp_origin(next_x, next_y, window.size(), bounds);
        }
        wm.move_window(drag.id, next_x, next_y);
        true
    }

    /// Ends the drag wherever the pointer is released; the last move stays.
    pub fn pointer_up(&mut self) -> bool {
        if let DragState::Dragging(drag) = self.state {
            tracing::debug!(window_id = %drag.id, "drag finished");
            self.state = DragState::Idle;
            return true;
        }
        false
    }

    /// Cancels the drag and puts the window back where it started.
    pub fn abort(&mut self, wm: &mut WindowManager) -> bool {
        let DragState::Dragging(drag) = self.state else {
            return false;
        };
        self.state = DragState::Idle;
        wm.move_window(drag.id, drag.origin_x, drag.origin_y);
        tracing::debug!(window_id = %drag.id, "drag aborted");
        true
    }

    /// Drops the session if it targets `id`. Called when the window is
    /// maximized, restored or closed mid-drag so a stale offset is never
    /// applied afterwards.
    pub fn interrupt(&mut self, id: WindowId) {
        if self.dragging() == Some(id) {
            self.state = DragState::Idle;
            tracing::debug!(window_id = %id, "drag interrupted");
        }
    }
}

/// Clamp a window origin so at least `MIN_FLOATING_VISIBLE_MARGIN` columns
/// stay inside `bounds` horizontally and the title row stays inside it
/// vertically.
fn clamp_origin(x: i32, y: i32, size: (u16, u16), bounds: Rect) -> (i32, i32) {
    if bounds.width == 0 || bounds.height == 0 {
        return (x, y);
    }
    let width = size.0.max(1) as i32;
    let margin = (MIN_FLOATING_VISIBLE_MARGIN as i32).min(width);
    let left = bounds.x as i32;
    let top = bounds.y as i32;
    let right = left + bounds.width as i32;
    let bottom = top + bounds.height as i32;

    let min_x = left - (width - margin);
    let max_x = (right - margin).max(min_x);
    let max_y = (bottom - 1).max(top);
    (x.clamp(min_x, max_x), y.clamp(top, max_y))
}
