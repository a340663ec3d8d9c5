//! Finder: a file browser over a fixed, in-memory listing.

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::components::{Component, ComponentContext};
use crate::theme;
use crate::ui::UiFrame;

const HOME: &str = "/Users/liquid-glass-lab";
const SIDEBAR: [&str; 5] = ["Home", "Documents", "Downloads", "Desktop", "Settings"];
const SIDEBAR_WIDTH: u16 = 14;
const BACK_LABEL: &str = "‹ Back";
/// Rows above the first listing row: toolbar and column header.
const LIST_TOP: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub name: &'static str,
    pub kind: EntryKind,
    pub size: Option<&'static str>,
    pub modified: Option<&'static str>,
}

const fn folder(name: &'static str) -> Entry {
    Entry {
        name,
        kind: EntryKind::Folder,
        size: None,
        modified: None,
    }
}

const fn file(name: &'static str, size: &'static str) -> Entry {
    Entry {
        name,
        kind: EntryKind::File,
        size: Some(size),
        modified: Some("2025-01-21"),
    }
}

pub const LISTING: [Entry; 8] = [
    folder("Documents"),
    folder("Downloads"),
    folder("Desktop"),
    folder("Applications"),
    file("README.md", "12.5 KB"),
    file("package.json", "2.1 KB"),
    folder("src"),
    file("index.html", "1.8 KB"),
];

#[derive(Debug)]
pub struct FinderComponent {
    segments: Vec<String>,
    /// Index into [`LISTING`] of the selected file.
    selected: Option<usize>,
    /// Index into the filtered listing.
    cursor: usize,
    filter: String,
}

impl FinderComponent {
    pub fn new() -> Self {
        Self {
            segments: HOME
                .split('/')
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
            selected: None,
            cursor: 0,
            filter: String::new(),
        }
    }

    pub fn path(&self) -> String {
        if self.segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", self.segments.join("/"))
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&'static str> {
        self.selected.map(|idx| LISTING[idx].name)
    }

    /// Indices into [`LISTING`] matching the current filter.
    fn visible_indices(&self) -> Vec<usize> {
        let needle = self.filter.to_lowercase();
        LISTING
            .iter()
            .enumerate()
            .filter(|(_, entry)| needle.is_empty() || entry.name.to_lowercase().contains(&needle))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn visible_entries(&self) -> Vec<&'static Entry> {
        self.visible_indices()
            .into_iter()
            .map(|idx| &LISTING[idx])
            .collect()
    }

    /// Opens a folder or selects a file, by position in the filtered listing.
    pub fn activate(&mut self, position: usize) {
        let Some(&idx) = self.visible_indices().get(position) else {
            return;
        };
        self.cursor = position;
        let entry = &LISTING[idx];
        match entry.kind {
            EntryKind::Folder => {
                self.segments.push(entry.name.to_string());
                self.selected = None;
                self.filter.clear();
                self.cursor = 0;
                tracing::debug!(path = %self.path(), "finder: opened folder");
            }
            EntryKind::File => {
                self.selected = Some(idx);
            }
        }
    }

    pub fn back(&mut self) {
        if self.segments.pop().is_some() {
            self.selected = None;
            self.cursor = 0;
        }
    }

    fn push_filter(&mut self, ch: char) {
        self.filter.push(ch);
        self.cursor = 0;
    }

    fn move_cursor(&mut self, down: bool) {
        let len = self.visible_indices().len();
        if len == 0 {
            self.cursor = 0;
        } else if down {
            self.cursor = (self.cursor + 1).min(len - 1);
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Up => self.move_cursor(false),
            KeyCode::Down => self.move_cursor(true),
            KeyCode::Enter => self.activate(self.cursor),
            KeyCode::Left => self.back(),
            KeyCode::Backspace => {
                if self.filter.pop().is_some() {
                    self.cursor = 0;
                } else {
                    self.back();
                }
            }
            KeyCode::Esc if !self.filter.is_empty() => {
                self.filter.clear();
                self.cursor = 0;
            }
            KeyCode::Char(ch)
                if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.push_filter(ch)
            }
            _ => return false,
        }
        true
    }

    fn handle_click(&mut self, column: u16, row: u16) -> bool {
        if row == 0 && (column as usize) < BACK_LABEL.chars().count() {
            self.back();
            return true;
        }
        if column >= SIDEBAR_WIDTH && row >= LIST_TOP {
            let position = (row - LIST_TOP) as usize;
            if position < self.visible_indices().len() {
                self.activate(position);
                return true;
            }
        }
        false
    }
}

impl Default for FinderComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for FinderComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = Style::default()
            .fg(theme::window_fg())
            .bg(theme::window_bg());
        let toolbar = Style::default()
            .fg(theme::toolbar_fg())
            .bg(theme::toolbar_bg());
        let muted = base.fg(theme::muted_fg());
        frame.fill(area, base);

        frame.fill(Rect { height: 1, ..area }, toolbar);
        frame.set_string(area.x, area.y, BACK_LABEL, toolbar);
        let path_x = area.x + BACK_LABEL.chars().count() as u16 + 2;
        frame.set_string(path_x, area.y, &self.path(), toolbar.add_modifier(Modifier::BOLD));
        if !self.filter.is_empty() {
            let label = format!("Filter: {}", self.filter);
            let x = area
                .x
                .saturating_add(area.width)
                .saturating_sub(label.chars().count() as u16 + 1);
            frame.set_string(x.max(path_x), area.y, &label, toolbar);
        }

        let sidebar_width = SIDEBAR_WIDTH.min(area.width);
        frame.set_string(area.x + 1, area.y + 1, "Favorites", muted);
        for (offset, label) in SIDEBAR.iter().enumerate() {
            frame.set_string(area.x + 1, area.y + 2 + offset as u16, label, base);
        }
        for y in area.y + 1..area.y.saturating_add(area.height) {
            frame.set_string(area.x + sidebar_width.saturating_sub(1), y, "│", muted);
        }

        let list_x = area.x + sidebar_width + 1;
        let list_width = area.width.saturating_sub(sidebar_width + 1) as usize;
        if list_width == 0 {
            return;
        }
        let header = format!("{:<18}{:>9}  {}", "Name", "Size", "Modified");
        frame.set_string(list_x, area.y + 1, &header, muted.add_modifier(Modifier::BOLD));

        let visible = self.visible_entries();
        if visible.is_empty() {
            frame.set_string(list_x, area.y + LIST_TOP, "No matching items", muted);
            return;
        }
        for (position, entry) in visible.iter().enumerate() {
            let y = area.y + LIST_TOP + position as u16;
            if y >= area.y.saturating_add(area.height) {
                break;
            }
            let glyph = match entry.kind {
                EntryKind::Folder => "▸",
                EntryKind::File => "·",
            };
            let line = format!(
                "{glyph} {:<16}{:>9}  {}",
                entry.name,
                entry.size.unwrap_or("--"),
                entry.modified.unwrap_or("--")
            );
            let is_selected = self.selected() == Some(entry.name);
            let style = if is_selected {
                Style::default()
                    .fg(theme::selection_fg())
                    .bg(theme::selection_bg())
            } else if ctx.focused() && position == self.cursor {
                base.add_modifier(Modifier::REVERSED)
            } else {
                base
            };
            let padded = format!("{line:<list_width$}");
            frame.set_string(list_x, y, &padded, style);
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                self.handle_key(key.code, key.modifiers)
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                self.handle_click(mouse.column, mouse.row)
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

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(finder: &mut FinderComponent, text: &str) {
        for ch in text.chars() {
            finder.handle_event(&key(KeyCode::Char(ch)), &ComponentContext::default());
        }
    }

    #[test]
    fn starts_at_home_with_full_listing() {
        let finder = FinderComponent::new();
        assert_eq!(finder.path(), HOME);
        assert_eq!(finder.visible_entries().len(), LISTING.len());
        assert_eq!(finder.selected(), None);
    }

    #[test]
    fn activating_folder_appends_to_path() {
        let mut finder = FinderComponent::new();
        finder.activate(4);
        assert_eq!(finder.selected(), Some("README.md"));
        finder.activate(0);
        assert_eq!(finder.path(), "/Users/liquid-glass-lab/Documents");
        assert_eq!(finder.selected(), None);
    }

    #[test]
    fn back_pops_to_root_and_stops() {
        let mut finder = FinderComponent::new();
        finder.back();
        assert_eq!(finder.path(), "/Users");
        finder.back();
        assert_eq!(finder.path(), "/");
        finder.back();
        assert_eq!(finder.path(), "/");
    }

    #[test]
    fn typing_filters_case_insensitively() {
        let mut finder = FinderComponent::new();
        type_str(&mut finder, "DO");
        let names: Vec<_> = finder.visible_entries().iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Documents", "Downloads"]);

        finder.handle_event(&key(KeyCode::Backspace), &ComponentContext::default());
        assert_eq!(finder.filter(), "D");
        assert_eq!(finder.path(), HOME);
    }

    #[test]
    fn enter_activates_cursor_row_within_filter() {
        let mut finder = FinderComponent::new();
        type_str(&mut finder, "json");
        finder.handle_event(&key(KeyCode::Enter), &ComponentContext::default());
        assert_eq!(finder.selected(), Some("package.json"));

        let mut finder = FinderComponent::new();
        finder.handle_event(&key(KeyCode::Down), &ComponentContext::default());
        finder.handle_event(&key(KeyCode::Enter), &ComponentContext::default());
        assert_eq!(finder.path(), "/Users/liquid-glass-lab/Downloads");
        assert_eq!(finder.cursor(), 0);
    }

    #[test]
    fn backspace_on_empty_filter_goes_back() {
        let mut finder = FinderComponent::new();
        finder.handle_event(&key(KeyCode::Backspace), &ComponentContext::default());
        assert_eq!(finder.path(), "/Users");
    }

    #[test]
    fn click_on_row_activates_entry() {
        let mut finder = FinderComponent::new();
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: SIDEBAR_WIDTH + 3,
            row: LIST_TOP + 7,
            modifiers: KeyModifiers::NONE,
        });
        assert!(finder.handle_event(&click, &ComponentContext::default()));
        assert_eq!(finder.selected(), Some("index.html"));
    }

    #[test]
    fn renders_path_and_rows() {
        let mut finder = FinderComponent::new();
        let area = Rect::new(0, 0, 62, 16);
        let mut buffer = Buffer::empty(area);
        finder.render(
            &mut UiFrame::from_parts(area, &mut buffer),
            area,
            &ComponentContext::new(true),
        );
        assert!(row_text(&buffer, 0).contains(HOME));
        assert!(row_text(&buffer, LIST_TOP).contains("Documents"));
        assert!(row_text(&buffer, LIST_TOP + 4).contains("12.5 KB"));
    }
}
