use ratatui::prelude::Rect;

use super::{FloatRect, Window, WindowId};
use crate::apps::AppRegistry;
use crate::constants::{CASCADE_ORIGIN_X, CASCADE_ORIGIN_Y, CASCADE_STEP_X, CASCADE_STEP_Y};

/// Owns the open windows and the focus reference.
///
/// Every operation that takes an id degrades to a no-op when the id is
/// unknown; absence of effect is the only failure signal. Windows keep their
/// insertion order; the focused window is tracked separately and only
/// reordered at draw time (see [`WindowManager::draw_order`]).
#[derive(Debug)]
pub struct WindowManager {
    registry: AppRegistry,
    windows: Vec<Window>,
    focused: Option<WindowId>,
    next_window_seq: u64,
}

impl WindowManager {
    pub fn new(registry: AppRegistry) -> Self {
        Self {
            registry,
            windows: Vec::new(),
            focused: None,
            next_window_seq: 1,
        }
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|window| window.id == id)
    }

    fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|window| window.id == id)
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.focused
    }

    /// Opens `app_id`, or restores and focuses its existing window.
    ///
    /// Returns the id of the (new or existing) window, or `None` when the
    /// application is not registered.
    pub fn open(&mut self, app_id: &str) -> Option<WindowId> {
        let Some(app) = self.registry.get(app_id) else {
            tracing::trace!(app_id, "open ignored: unknown application");
            return None;
        };
        let (app_key, name) = (app.id, app.name);
        let (width, height) = app.window_size();

        if let Some(existing) = self.windows.iter_mut().find(|w| w.app_id == app_key) {
            if existing.minimized {
                existing.minimized = false;
                tracing::debug!(window_id = %existing.id, app_id = app_key, "restored window");
            }
            let id = existing.id;
            self.focused = Some(id);
            return Some(id);
        }

        let id = WindowId::new(self.next_window_seq);
        self.next_window_seq = self.next_window_seq.saturating_add(1);
        let cascade = self.windows.len() as i32;
        let rect = FloatRect {
            x: CASCADE_ORIGIN_X + cascade * CASCADE_STEP_X,
            y: CASCADE_ORIGIN_Y + cascade * CASCADE_STEP_Y,
            width,
            height,
        };
        self.windows
            .push(Window::new(id, app_key, name.to_string(), rect));
        self.focused = Some(id);
        tracing::debug!(window_id = %id, app_id = app_key, "opened window");
        Some(id)
    }

    /// Removes the window; clears the focus reference if it pointed at it.
    ///
    /// Returns whether a window was removed.
    pub fn close(&mut self, id: WindowId) -> bool {
        let Some(index) = self.windows.iter().position(|window| window.id == id) else {
            tracing::trace!(window_id = %id, "close ignored: unknown window");
            return false;
        };
        self.windows.remove(index);
        if self.focused == Some(id) {
            self.focused = None;
        }
        tracing::debug!(window_id = %id, "closed window");
        true
    }

    /// Hides the window while keeping it (and its geometry) in the
    /// collection. The focus reference is left untouched.
    pub fn minimize(&mut self, id: WindowId) {
        if let Some(window) = self.window_mut(id) {
            window.minimized = true;
            tracing::debug!(window_id = %id, "minimized window");
        }
    }

    /// Flips between maximized and the stored floating geometry.
    ///
    /// Returns whether a window was toggled.
    pub fn toggle_maximize(&mut self, id: WindowId) -> bool {
        let Some(window) = self.window_mut(id) else {
            return false;
        };
        window.maximized = !window.maximized;
        tracing::debug!(window_id = %id, maximized = window.maximized, "toggled maximize");
        true
    }

    /// Moves the window origin. Maximized windows ignore moves.
    pub fn move_window(&mut self, id: WindowId, x: i32, y: i32) {
        if let Some(window) = self.window_mut(id)
            && !window.maximized
        {
            window.rect.x = x;
            window.rect.y = y;
        }
    }

    pub fn focus(&mut self, id: WindowId) {
        if self.window(id).is_some() && self.focused != Some(id) {
            self.focused = Some(id);
            tracing::debug!(window_id = %id, "focused window");
        }
    }

    pub fn is_visible(&self, id: WindowId) -> bool {
        self.window(id).is_some_and(Window::is_visible)
    }

    /// Visible windows bottom to top: insertion order with the focused
    /// window lifted above the rest.
    pub fn draw_order(&self) -> Vec<WindowId> {
        let mut order: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|window| window.is_visible() && Some(window.id) != self.focused)
            .map(Window::id)
            .collect();
        if let Some(focused) = self.focused
            && self.is_visible(focused)
        {
            order.push(focused);
        }
        order
    }

    /// Geometry the window occupies on screen: the whole viewport when
    /// maximized, the stored floating rect otherwise.
    pub fn effective_rect(&self, id: WindowId, viewport: Rect) -> Option<FloatRect> {
        self.window(id).map(|window| {
            if window.maximized {
                FloatRect::from_rect(viewport)
            } else {
                window.rect
            }
        })
    }

    /// Topmost visible window under the given cell.
    pub fn window_at(&self, column: i32, row: i32, viewport: Rect) -> Option<WindowId> {
        self.draw_order().into_iter().rev().find(|&id| {
            self.effective_rect(id, viewport)
                .is_some_and(|rect| rect.contains(column, row))
        })
    }

    /// Moves focus to the next (or previous) visible window in insertion
    /// order, wrapping around.
    pub fn cycle_focus(&mut self, forward: bool) {
        let visible: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|window| window.is_visible())
            .map(Window::id)
            .collect();
        if visible.is_empty() {
            return;
        }
        let next = match self
            .focused
            .and_then(|current| visible.iter().position(|id| *id == current))
        {
            Some(idx) => {
                let step = if forward { 1isize } else { -1isize };
                let len = visible.len() as isize;
                visible[((idx as isize + step).rem_euclid(len)) as usize]
            }
            None if forward => visible[0],
            None => visible[visible.len() - 1],
        };
        self.focus(next);
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(AppRegistry::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect {
            x: 0,
            y: 1,
            width: 120,
            height: 40,
        }
    }

    #[test]
    fn new_windows_cascade_diagonally() {
        let mut wm = WindowManager::default();
        let a = wm.open("finder").unwrap();
        let b = wm.open("notes").unwrap();
        let a_pos = wm.window(a).unwrap().position();
        let b_pos = wm.window(b).unwrap().position();
        assert_eq!(a_pos, (CASCADE_ORIGIN_X, CASCADE_ORIGIN_Y));
        assert_eq!(
            b_pos,
            (a_pos.0 + CASCADE_STEP_X, a_pos.1 + CASCADE_STEP_Y)
        );
    }

    #[test]
    fn window_ids_are_unique_even_after_close() {
        let mut wm = WindowManager::default();
        let first = wm.open("notes").unwrap();
        wm.close(first);
        let second = wm.open("notes").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn size_comes_from_application() {
        let mut wm = WindowManager::default();
        let id = wm.open("safari").unwrap();
        assert_eq!(wm.window(id).unwrap().size(), (72, 20));
    }

    #[test]
    fn minimize_keeps_focus_reference() {
        let mut wm = WindowManager::default();
        let id = wm.open("notes").unwrap();
        wm.minimize(id);
        assert_eq!(wm.focused(), Some(id));
        assert!(!wm.is_visible(id));
        assert!(wm.draw_order().is_empty());
    }

    #[test]
    fn focused_window_is_drawn_last() {
        let mut wm = WindowManager::default();
        let a = wm.open("finder").unwrap();
        let b = wm.open("notes").unwrap();
        let c = wm.open("safari").unwrap();
        wm.focus(a);
        assert_eq!(wm.draw_order(), vec![b, c, a]);
        // insertion order itself is untouched
        let ids: Vec<_> = wm.windows().iter().map(Window::id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn maximized_window_fills_viewport_and_ignores_moves() {
        let mut wm = WindowManager::default();
        let id = wm.open("notes").unwrap();
        let before = wm.window(id).unwrap().rect();
        assert!(wm.toggle_maximize(id));
        assert_eq!(
            wm.effective_rect(id, viewport()),
            Some(FloatRect::from_rect(viewport()))
        );
        wm.move_window(id, 50, 20);
        assert_eq!(wm.window(id).unwrap().rect(), before);
    }

    #[test]
    fn window_at_prefers_topmost() {
        let mut wm = WindowManager::default();
        let a = wm.open("finder").unwrap();
        let b = wm.open("notes").unwrap();
        // both cover (10, 5); b is focused and therefore on top
        assert_eq!(wm.window_at(10, 5, viewport()), Some(b));
        wm.focus(a);
        assert_eq!(wm.window_at(10, 5, viewport()), Some(a));
        assert_eq!(wm.window_at(119, 39, viewport()), None);
    }

    #[test]
    fn focus_unknown_id_is_noop() {
        let mut wm = WindowManager::default();
        let id = wm.open("notes").unwrap();
        wm.close(id);
        wm.focus(id);
        assert_eq!(wm.focused(), None);
    }

    #[test]
    fn cycle_focus_skips_minimized_and_wraps() {
        let mut wm = WindowManager::default();
        let a = wm.open("finder").unwrap();
        let b = wm.open("notes").unwrap();
        let c = wm.open("safari").unwrap();
        wm.minimize(b);
        wm.cycle_focus(true);
        assert_eq!(wm.focused(), Some(a));
        wm.cycle_focus(true);
        assert_eq!(wm.focused(), Some(c));
        wm.cycle_focus(false);
        assert_eq!(wm.focused(), Some(a));
    }
}
