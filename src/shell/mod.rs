//! Shell chrome around the window area: the menu bar on the first row and
//! the dock on the last.

pub mod battery;
pub mod clock;
pub mod dock;
pub mod menu_bar;

use ratatui::layout::Rect;

pub use battery::Battery;
pub use clock::Clock;
pub use dock::{DOCK_ENTRIES, Dock, DockEntry};
pub use menu_bar::{APP_MENU, MenuAction, MenuBar, MenuItem, MenuOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShellLayout {
    pub menu_bar: Rect,
    pub viewport: Rect,
    pub dock: Rect,
}

/// Splits the screen into menu bar (top row), dock (bottom row) and the
/// window viewport in between. Tiny screens give up the dock first.
pub fn split_area(area: Rect) -> ShellLayout {
    let menu_h = 1u16.min(area.height);
    let dock_h = 1u16.min(area.height.saturating_sub(menu_h));
    let menu_bar = Rect {
        height: menu_h,
        ..area
    };
    let dock = Rect {
        y: area.y.saturating_add(area.height).saturating_sub(dock_h),
        height: dock_h,
        ..area
    };
    let viewport = Rect {
        y: area.y.saturating_add(menu_h),
        height: area.height.saturating_sub(menu_h).saturating_sub(dock_h),
        ..area
    };
    ShellLayout {
        menu_bar,
        viewport,
        dock,
    }
}

pub(crate) fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
