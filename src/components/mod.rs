use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod debug_log;

pub use debug_log::{DebugLogComponent, DebugLogHandle};

/// Rendering state handed to components by whoever hosts them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentContext {
    focused: bool,
    overlay: bool,
}

impl ComponentContext {
    pub const fn new(focused: bool) -> Self {
        Self {
            focused,
            overlay: false,
        }
    }

    /// Whether the hosting window holds the desktop focus.
    pub const fn focused(&self) -> bool {
        self.focused
    }

    /// Whether the component is drawn above the desktop instead of in a window.
    pub const fn overlay(&self) -> bool {
        self.overlay
    }

    pub const fn with_overlay(mut self, overlay: bool) -> Self {
        self.overlay = overlay;
        self
    }
}

/// A piece of UI hosted inside a window body or an overlay.
///
/// Mouse events are delivered already localized: `column`/`row` are
/// relative to the `area` most recently passed to `render`.
pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct Inert;

    impl Component for Inert {
        fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {}
    }

    #[test]
    fn default_handle_event_declines() {
        let mut inert = Inert;
        let key = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert!(!inert.handle_event(&key, &ComponentContext::default()));
    }

    #[test]
    fn overlay_flag_is_independent_of_focus() {
        let ctx = ComponentContext::new(true).with_overlay(true);
        assert!(ctx.focused());
        assert!(ctx.overlay());
        assert!(!ComponentContext::new(false).overlay());
    }
}
