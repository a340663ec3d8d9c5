use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use crate::theme;
use crate::ui::UiFrame;

/// What a pointer-down on the title bar asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Close,
    Minimize,
    Maximize,
    Drag,
}

/// Draws window chrome and answers hit tests against it.
///
/// All coordinates are window-local: `(0, 0)` is the window's top-left cell.
pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(
        &self,
        frame: &mut UiFrame<'_>,
        rect: Rect,
        title: &str,
        focused: bool,
        maximized: bool,
    );

    /// Hit test a window-local cell against the chrome.
    fn header_action(&self, width: u16, column: u16, row: u16) -> Option<HeaderAction>;

    /// Area left for the application body inside `rect`.
    fn content_rect(&self, rect: Rect) -> Rect;
}

/// Title bar with three round buttons on the left (close, minimize,
/// maximize) and a centered title, above a thin border.
#[derive(Debug, Default)]
pub struct TrafficLightDecorator;

const BUTTON_COLUMNS: [(u16, HeaderAction); 3] = [
    (2, HeaderAction::Close),
    (4, HeaderAction::Minimize),
    (6, HeaderAction::Maximize),
];

impl WindowDecorator for TrafficLightDecorator {
    fn render_window(
        &self,
        frame: &mut UiFrame<'_>,
        rect: Rect,
        title: &str,
        focused: bool,
        maximized: bool,
    ) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let header_style = Style::default()
            .bg(if focused {
                theme::header_focused_bg()
            } else {
                theme::header_unfocused_bg()
            })
            .fg(theme::header_fg());
        let border_style = Style::default()
            .fg(theme::window_border())
            .bg(theme::window_bg());

        frame.fill(
            Rect {
                height: 1,
                ..rect
            },
            header_style,
        );
        let right = rect.x.saturating_add(rect.width).saturating_sub(1);
        let bottom = rect.y.saturating_add(rect.height).saturating_sub(1);

        for (offset, action) in BUTTON_COLUMNS {
            if offset + 1 >= rect.width {
                break;
            }
            let color = match action {
                HeaderAction::Close => theme::traffic_close(),
                HeaderAction::Minimize => theme::traffic_minimize(),
                HeaderAction::Maximize => theme::traffic_maximize(),
                HeaderAction::Drag => continue,
            };
            let glyph = match (action, maximized) {
                (HeaderAction::Maximize, true) => "◉",
                _ => "●",
            };
            frame.set_string(rect.x + offset, rect.y, glyph, header_style.fg(color));
        }

        let title_start = rect.x + 8;
        let title_width = right.saturating_sub(title_start) as usize;
        if title_width > 0 {
            let title_style = if focused {
                header_style.add_modifier(Modifier::BOLD)
            } else {
                header_style
            };
            let shown: String = title.chars().take(title_width).collect();
            let pad = title_width.saturating_sub(shown.chars().count()) / 2;
            frame.set_string(title_start + pad as u16, rect.y, &shown, title_style);
        }

        for y in rect.y.saturating_add(1)..bottom {
            frame.set_string(rect.x, y, "│", border_style);
            frame.set_string(right, y, "│", border_style);
        }
        if bottom > rect.y {
            let mut line = String::with_capacity(rect.width as usize * 3);
            line.push('╰');
            for _ in 0..rect.width.saturating_sub(2) {
                line.push('─');
            }
            line.push('╯');
            frame.set_string(rect.x, bottom, &line, border_style);
        }
    }

    fn header_action(&self, width: u16, column: u16, row: u16) -> Option<HeaderAction> {
        if row != 0 || column >= width {
            return None;
        }
        BUTTON_COLUMNS
            .iter()
            .find(|(offset, _)| *offset == column && offset + 1 < width)
            .map(|(_, action)| *action)
            .or(Some(HeaderAction::Drag))
    }

    fn content_rect(&self, rect: Rect) -> Rect {
        Rect {
            x: rect.x.saturating_add(1),
            y: rect.y.saturating_add(1),
            width: rect.width.saturating_sub(2),
            height: rect.height.saturating_sub(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::row_text;
    use ratatui::buffer::Buffer;

    #[test]
    fn buttons_and_title_bar_hit_tests() {
        let deco = TrafficLightDecorator;
        assert_eq!(deco.header_action(30, 2, 0), Some(HeaderAction::Close));
        assert_eq!(deco.header_action(30, 4, 0), Some(HeaderAction::Minimize));
        assert_eq!(deco.header_action(30, 6, 0), Some(HeaderAction::Maximize));
        assert_eq!(deco.header_action(30, 3, 0), Some(HeaderAction::Drag));
        assert_eq!(deco.header_action(30, 15, 0), Some(HeaderAction::Drag));
        assert_eq!(deco.header_action(30, 15, 1), None);
        assert_eq!(deco.header_action(30, 30, 0), None);
    }

    #[test]
    fn content_rect_sits_inside_chrome() {
        let deco = TrafficLightDecorator;
        let inner = deco.content_rect(Rect {
            x: 0,
            y: 0,
            width: 20,
            height: 8,
        });
        assert_eq!(
            inner,
            Rect {
                x: 1,
                y: 1,
                width: 18,
                height: 6,
            }
        );
    }

    #[test]
    fn renders_title_and_bottom_border() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 24,
            height: 4,
        };
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        TrafficLightDecorator.render_window(&mut frame, area, "Notes", true, false);
        let header = row_text(&buffer, 0);
        assert!(header.contains("Notes"));
        assert!(header.contains('●'));
        assert!(row_text(&buffer, 3).starts_with('╰'));
        assert!(row_text(&buffer, 1).starts_with('│'));
    }
}
