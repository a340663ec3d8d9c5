use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::rect_contains;
use crate::theme;
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockEntry {
    pub app_id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Dock contents, left to right. Entries without a registered application
/// are shown but do nothing when clicked.
pub const DOCK_ENTRIES: [DockEntry; 6] = [
    DockEntry {
        app_id: "finder",
        label: "Finder",
        icon: "◧",
    },
    DockEntry {
        app_id: "safari",
        label: "Safari",
        icon: "◎",
    },
    DockEntry {
        app_id: "messages",
        label: "Messages",
        icon: "✉",
    },
    DockEntry {
        app_id: "notes",
        label: "Notes",
        icon: "✎",
    },
    DockEntry {
        app_id: "maps",
        label: "Maps",
        icon: "⌖",
    },
    DockEntry {
        app_id: "books",
        label: "Books",
        icon: "▤",
    },
];

#[derive(Debug)]
pub struct Dock {
    entries: Vec<DockEntry>,
    hits: Vec<(Rect, &'static str)>,
}

impl Dock {
    pub fn new(entries: impl IntoIterator<Item = DockEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            hits: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[DockEntry] {
        &self.entries
    }

    fn chip(entry: &DockEntry) -> String {
        format!(" {} {} ", entry.icon, entry.label)
    }

    /// Renders the entries centered in `area`; entries whose app id is in
    /// `running` are highlighted.
    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, running: &[&str]) {
        self.hits.clear();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = Style::default().fg(theme::dock_fg()).bg(theme::dock_bg());
        frame.fill(area, base);

        let chips: Vec<String> = self.entries.iter().map(Self::chip).collect();
        let total: u16 = chips
            .iter()
            .map(|chip| chip.chars().count() as u16 + 1)
            .sum::<u16>()
            .saturating_sub(1);
        let mut x = area.x + area.width.saturating_sub(total) / 2;
        let max_x = area.x.saturating_add(area.width);
        let y = area.y + area.height.saturating_sub(1);
        for (entry, chip) in self.entries.iter().zip(&chips) {
            let width = chip.chars().count() as u16;
            if x >= max_x {
                break;
            }
            let style = if running.contains(&entry.app_id) {
                base.fg(theme::dock_running_fg())
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                base
            };
            frame.set_string(x, y, chip, style);
            self.hits.push((
                Rect {
                    x,
                    y,
                    width: width.min(max_x - x),
                    height: 1,
                },
                entry.app_id,
            ));
            x = x.saturating_add(width + 1);
        }
    }

    /// App id of the entry under the cell, from the last render.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<&'static str> {
        self.hits
            .iter()
            .find(|(rect, _)| rect_contains(*rect, column, row))
            .map(|(_, app_id)| *app_id)
    }
}

impl Default for Dock {
    fn default() -> Self {
        Self::new(DOCK_ENTRIES)
    }
}
