pub mod decorator;
pub mod drag;

mod window_manager;

use std::fmt;

use ratatui::prelude::Rect;

pub use drag::{DragController, DragState, HeaderDrag};
pub use window_manager::WindowManager;

/// Signed floating rectangle origin with unsigned size.
///
/// Windows may be dragged partially or fully outside the viewport, so the
/// origin is signed; only the visible intersection is ever drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.x as i32,
            y: rect.y as i32,
            width: rect.width,
            height: rect.height,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + self.width as i32
            && y < self.y + self.height as i32
    }

    /// Portion of the rect that falls inside `bounds`, as an unsigned rect.
    pub fn visible_in(&self, bounds: Rect) -> Rect {
        let left = self.x.max(bounds.x as i32);
        let top = self.y.max(bounds.y as i32);
        let right = (self.x + self.width as i32).min(bounds.x as i32 + bounds.width as i32);
        let bottom = (self.y + self.height as i32).min(bounds.y as i32 + bounds.height as i32);
        if right <= left || bottom <= top {
            return Rect::default();
        }
        Rect {
            x: left as u16,
            y: top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        }
    }
}

/// Opaque window identifier, allocated from a monotonic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u64);

impl WindowId {
    pub(crate) const fn new(seq: u64) -> Self {
        Self(seq)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

/// One open instance of an application.
///
/// `rect` always holds the floating (pre-maximize) geometry; maximizing only
/// flips a flag so restoring returns to the exact same position and size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    id: WindowId,
    app_id: &'static str,
    title: String,
    open: bool,
    minimized: bool,
    maximized: bool,
    rect: FloatRect,
}

impl Window {
    fn new(id: WindowId, app_id: &'static str, title: String, rect: FloatRect) -> Self {
        Self {
            id,
            app_id,
            title,
            open: true,
            minimized: false,
            maximized: false,
            rect,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn app_id(&self) -> &'static str {
        self.app_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    /// Stored floating geometry, unaffected by the maximized flag.
    pub fn rect(&self) -> FloatRect {
        self.rect
    }

    pub fn position(&self) -> (i32, i32) {
        (self.rect.x, self.rect.y)
    }

    pub fn size(&self) -> (u16, u16) {
        (self.rect.width, self.rect.height)
    }

    /// Whether the window belongs in the drawn set.
    pub fn is_visible(&self) -> bool {
        self.is_open() && !self.minimized
    }
}
