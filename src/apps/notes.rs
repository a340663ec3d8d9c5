//! Notes: a plain-text editor with live word and character counts.

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::components::{Component, ComponentContext};
use crate::theme;
use crate::ui::UiFrame;

const WELCOME: &str = indoc! {"
    # Welcome to Liquid Glass Lab

    This is a simple text editor running inside a terminal desktop.

    ## Features
    - Draggable windows with traffic-light controls
    - Interactive window controls
    - A dock to launch applications

    ## Getting Started
    1. Drag a window by its title bar to move it
    2. Use the window controls to close, minimize, or maximize
    3. Try the different applications in the dock

    Happy coding!"};

const TOOLBAR: &str = " File  Edit  Format  View │ Bold  Italic  Underline";

#[derive(Debug)]
pub struct NotesComponent {
    lines: Vec<String>,
    /// Cursor as (line, char column).
    row: usize,
    col: usize,
    scroll_top: usize,
    /// Horizontal offset and text-area height from the last render.
    h_scroll: usize,
    view_height: usize,
}

impl NotesComponent {
    pub fn new() -> Self {
        Self::with_text(WELCOME)
    }

    pub fn with_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            row: 0,
            col: 0,
            scroll_top: 0,
            h_scroll: 0,
            view_height: 0,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn word_count(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.split_whitespace().count())
            .sum()
    }

    pub fn char_count(&self) -> usize {
        let chars: usize = self.lines.iter().map(|line| line.chars().count()).sum();
        chars + self.lines.len() - 1
    }

    pub fn status_line(&self) -> String {
        format!(
            "Words: {}  Characters: {}  Plain Text",
            self.word_count(),
            self.char_count()
        )
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |line| line.chars().count())
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map_or(line.len(), |(idx, _)| idx)
    }

    pub fn insert_char(&mut self, ch: char) {
        let line = &mut self.lines[self.row];
        let at = Self::byte_index(line, self.col);
        line.insert(at, ch);
        self.col += 1;
    }

    pub fn insert_newline(&mut self) {
        let line = &mut self.lines[self.row];
        let at = Self::byte_index(line, self.col);
        let rest = line.split_off(at);
        self.row += 1;
        self.col = 0;
        self.lines.insert(self.row, rest);
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let at = Self::byte_index(line, self.col - 1);
            line.remove(at);
            self.col -= 1;
        } else if self.row > 0 {
            let tail = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&tail);
        }
    }

    fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    fn move_vertical(&mut self, down: bool) {
        if down && self.row + 1 < self.lines.len() {
            self.row += 1;
        } else if !down && self.row > 0 {
            self.row -= 1;
        }
        self.col = self.col.min(self.line_len(self.row));
    }

    fn text_area(area: Rect) -> Rect {
        Rect {
            x: area.x.saturating_add(1),
            y: area.y.saturating_add(1),
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(2),
        }
    }

    fn scroll_to_cursor(&mut self, view: usize) {
        if view == 0 {
            return;
        }
        if self.row < self.scroll_top {
            self.scroll_top = self.row;
        } else if self.row >= self.scroll_top + view {
            self.scroll_top = self.row + 1 - view;
        }
    }
}

impl Default for NotesComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for NotesComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width == 0 || area.height < 3 {
            return;
        }
        let base = Style::default()
            .fg(theme::window_fg())
            .bg(theme::window_bg());
        let bar = Style::default()
            .fg(theme::toolbar_fg())
            .bg(theme::toolbar_bg());
        frame.fill(area, base);
        frame.fill(Rect { height: 1, ..area }, bar);
        frame.set_string(area.x, area.y, TOOLBAR, bar);

        let text = Self::text_area(area);
        self.scroll_to_cursor(text.height as usize);
        // keep the cursor column in view on long lines
        let h_scroll = self.col.saturating_sub(text.width.saturating_sub(1) as usize);
        self.h_scroll = h_scroll;
        self.view_height = text.height as usize;
        for (offset, line) in self
            .lines
            .iter()
            .skip(self.scroll_top)
            .take(text.height as usize)
            .enumerate()
        {
            let visible: String = line.chars().skip(h_scroll).collect();
            frame.set_string(text.x, text.y + offset as u16, &visible, base);
        }
        if ctx.focused() && self.row >= self.scroll_top {
            let x = text.x as usize + self.col - h_scroll;
            let y = text.y as usize + self.row - self.scroll_top;
            let under = self.lines[self.row]
                .chars()
                .nth(self.col)
                .map_or_else(|| " ".to_string(), |ch| ch.to_string());
            frame.set_string(x as u16, y as u16, &under, base.add_modifier(Modifier::REVERSED));
        }

        let status_y = area.y + area.height - 1;
        frame.fill(
            Rect {
                y: status_y,
                height: 1,
                ..area
            },
            bar.fg(theme::muted_fg()),
        );
        frame.set_string(area.x + 1, status_y, &self.status_line(), bar.fg(theme::muted_fg()));
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                match key.code {
                    KeyCode::Char(ch)
                        if !key
                            .modifiers
                            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                    {
                        self.insert_char(ch)
                    }
                    KeyCode::Enter => self.insert_newline(),
                    KeyCode::Backspace => self.backspace(),
                    KeyCode::Tab => {
                        for _ in 0..4 {
                            self.insert_char(' ');
                        }
                    }
                    KeyCode::Left => self.move_left(),
                    KeyCode::Right => self.move_right(),
                    KeyCode::Up => self.move_vertical(false),
                    KeyCode::Down => self.move_vertical(true),
                    KeyCode::Home => self.col = 0,
                    KeyCode::End => self.col = self.line_len(self.row),
                    _ => return false,
                }
                true
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                // text rows start below the toolbar, offset by the one-cell margin
                let view_row = mouse.row as usize;
                if view_row == 0 || view_row > self.view_height || mouse.column == 0 {
                    return false;
                }
                let row = self.scroll_top + view_row - 1;
                if row >= self.lines.len() {
                    return false;
                }
                self.row = row;
                self.col = (self.h_scroll + mouse.column as usize - 1).min(self.line_len(row));
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::row_text;
    use crossterm::event::{KeyEvent, MouseEvent};
    use ratatui::buffer::Buffer;

    fn press(notes: &mut NotesComponent, code: KeyCode) {
        notes.handle_event(
            &Event::Key(KeyEvent::new(code, KeyModifiers::NONE)),
            &ComponentContext::default(),
        );
    }

    #[test]
    fn welcome_document_is_loaded() {
        let notes = NotesComponent::new();
        assert!(notes.text().starts_with("# Welcome to Liquid Glass Lab\n\n"));
        assert!(notes.text().ends_with("Happy coding!"));
        assert!(notes.word_count() > 0);
    }

    #[test]
    fn counts_follow_whitespace_tokens() {
        let notes = NotesComponent::with_text("  hello   world \nagain");
        assert_eq!(notes.word_count(), 3);
        assert_eq!(notes.char_count(), "  hello   world \nagain".chars().count());
        assert_eq!(
            NotesComponent::with_text("   ").status_line(),
            "Words: 0  Characters: 3  Plain Text"
        );
    }

    #[test]
    fn typing_enter_and_backspace_edit_at_cursor() {
        let mut notes = NotesComponent::with_text("ac");
        press(&mut notes, KeyCode::Right);
        press(&mut notes, KeyCode::Char('b'));
        assert_eq!(notes.text(), "abc");
        press(&mut notes, KeyCode::Enter);
        assert_eq!(notes.text(), "ab\nc");
        assert_eq!(notes.cursor(), (1, 0));
        press(&mut notes, KeyCode::Backspace);
        assert_eq!(notes.text(), "abc");
        assert_eq!(notes.cursor(), (0, 2));
    }

    #[test]
    fn vertical_moves_clamp_column() {
        let mut notes = NotesComponent::with_text("long line\nab");
        press(&mut notes, KeyCode::End);
        press(&mut notes, KeyCode::Down);
        assert_eq!(notes.cursor(), (1, 2));
        press(&mut notes, KeyCode::Down);
        assert_eq!(notes.cursor(), (1, 2));
    }

    #[test]
    fn multibyte_characters_edit_cleanly() {
        let mut notes = NotesComponent::with_text("é");
        press(&mut notes, KeyCode::End);
        press(&mut notes, KeyCode::Char('✎'));
        press(&mut notes, KeyCode::Left);
        press(&mut notes, KeyCode::Backspace);
        assert_eq!(notes.text(), "✎");
    }

    #[test]
    fn status_line_is_rendered_on_last_row() {
        let mut notes = NotesComponent::with_text("one two");
        let area = Rect::new(0, 0, 50, 6);
        let mut buffer = Buffer::empty(area);
        notes.render(
            &mut UiFrame::from_parts(area, &mut buffer),
            area,
            &ComponentContext::new(true),
        );
        assert!(row_text(&buffer, 5).contains("Words: 2  Characters: 7  Plain Text"));
        assert!(row_text(&buffer, 1).contains("one two"));
    }

    fn click(notes: &mut NotesComponent, column: u16, row: u16) -> bool {
        notes.handle_event(
            &Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            }),
            &ComponentContext::default(),
        )
    }

    fn render_into(notes: &mut NotesComponent, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        notes.render(
            &mut UiFrame::from_parts(area, &mut buffer),
            area,
            &ComponentContext::new(true),
        );
        buffer
    }

    #[test]
    fn click_maps_through_horizontal_scroll() {
        let mut notes = NotesComponent::with_text("abcdefghijklmnopqrstuvwxyz\nshort");
        press(&mut notes, KeyCode::End);
        // 12 wide => 10 text columns; cursor at 26 scrolls by 17
        let buffer = render_into(&mut notes, 12, 6);
        assert!(row_text(&buffer, 1).starts_with(" rstuvwxyz"));

        assert!(click(&mut notes, 1, 1));
        assert_eq!(notes.cursor(), (0, 17));
    }

    #[test]
    fn clicks_outside_text_rows_are_ignored() {
        let mut notes = NotesComponent::with_text("1\n2\n3\n4\n5\n6\n7\n8");
        render_into(&mut notes, 20, 6);
        // rows 1..=4 hold text; row 5 is the status line
        assert!(!click(&mut notes, 2, 5));
        assert_eq!(notes.cursor(), (0, 0));
        assert!(click(&mut notes, 1, 4));
        assert_eq!(notes.cursor(), (3, 0));
    }
}
