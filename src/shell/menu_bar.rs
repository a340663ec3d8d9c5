//! Top menu bar: the app menu, decorative menu titles and the status items
//! (wifi, battery, clock).

use std::fmt::Display;
use std::time::Instant;

use chrono::{DateTime, TimeZone};
use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::{Battery, Clock, rect_contains};
use crate::theme;
use crate::ui::UiFrame;

const APP_MENU_LABEL: &str = " ◆ ";
const MENU_TITLES: [&str; 5] = ["File", "Edit", "View", "Window", "Help"];
const WIFI_LABEL: &str = "≋ Wi-Fi";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    About,
    Settings,
    AppStore,
    RecentItems,
    ForceQuit,
    Sleep,
    Restart,
    ShutDown,
    LockScreen,
    LogOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Entry(&'static str, MenuAction),
    Separator,
}

pub const APP_MENU: [MenuItem; 13] = [
    MenuItem::Entry("About This Mac", MenuAction::About),
    MenuItem::Entry("System Settings...", MenuAction::Settings),
    MenuItem::Entry("App Store...", MenuAction::AppStore),
    MenuItem::Separator,
    MenuItem::Entry("Recent Items", MenuAction::RecentItems),
    MenuItem::Entry("Force Quit...", MenuAction::ForceQuit),
    MenuItem::Separator,
    MenuItem::Entry("Sleep", MenuAction::Sleep),
    MenuItem::Entry("Restart...", MenuAction::Restart),
    MenuItem::Entry("Shut Down...", MenuAction::ShutDown),
    MenuItem::Separator,
    MenuItem::Entry("Lock Screen", MenuAction::LockScreen),
    MenuItem::Entry("Log Out...", MenuAction::LogOut),
];

/// What the menu bar did with an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Not for the menu bar; keep routing.
    Ignored,
    Consumed,
    Activated(MenuAction),
}

#[derive(Debug)]
pub struct MenuBar {
    menu_open: bool,
    selected: usize,
    anchor_rect: Option<Rect>,
    dropdown_rect: Option<Rect>,
    item_hits: Vec<(Rect, usize)>,
    clock: Clock,
    battery: Battery,
}

impl MenuBar {
    /// Creates the menu bar and starts its periodic status items.
    pub fn new<Tz>(now: Instant, wall: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self::with_battery(Battery::new(), now, wall)
    }

    pub fn with_battery<Tz>(mut battery: Battery, now: Instant, wall: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut clock = Clock::new();
        clock.start(now, wall);
        battery.start(now);
        Self {
            menu_open: false,
            selected: 0,
            anchor_rect: None,
            dropdown_rect: None,
            item_hits: Vec::new(),
            clock,
            battery,
        }
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    /// Stops the clock; the menu bar is going away.
    pub fn shutdown(&mut self) {
        self.clock.stop();
    }

    pub fn tick<Tz>(&mut self, now: Instant, wall: &DateTime<Tz>) -> bool
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let clock = self.clock.tick(now, wall);
        let battery = self.battery.tick(now);
        clock || battery
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn open_menu(&mut self) {
        self.menu_open = true;
        self.selected = 0;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
        self.dropdown_rect = None;
        self.item_hits.clear();
    }

    pub fn toggle_menu(&mut self) {
        if self.menu_open {
            self.close_menu();
        } else {
            self.open_menu();
        }
    }

    pub fn selected_item(&self) -> Option<MenuItem> {
        self.menu_open.then(|| APP_MENU[self.selected])
    }

    fn activate(&mut self, index: usize) -> MenuOutcome {
        match APP_MENU.get(index) {
            Some(MenuItem::Entry(label, action)) => {
                tracing::info!(item = *label, "menu action");
                self.close_menu();
                MenuOutcome::Activated(*action)
            }
            _ => MenuOutcome::Consumed,
        }
    }

    fn step_selection(&mut self, down: bool) {
        let len = APP_MENU.len();
        let mut next = self.selected;
        loop {
            next = if down {
                (next + 1) % len
            } else {
                (next + len - 1) % len
            };
            if matches!(APP_MENU[next], MenuItem::Entry(..)) {
                break;
            }
        }
        self.selected = next;
    }

    /// Pointer-down anywhere on screen. Presses outside the bar's own
    /// surfaces close the dropdown and are reported as `Ignored` so they
    /// still reach whatever is underneath.
    pub fn handle_mouse_down(&mut self, column: u16, row: u16) -> MenuOutcome {
        if self
            .anchor_rect
            .is_some_and(|rect| rect_contains(rect, column, row))
        {
            self.toggle_menu();
            return MenuOutcome::Consumed;
        }
        if !self.menu_open {
            return MenuOutcome::Ignored;
        }
        if let Some(&(_, index)) = self
            .item_hits
            .iter()
            .find(|(rect, _)| rect_contains(*rect, column, row))
        {
            return self.activate(index);
        }
        if self
            .dropdown_rect
            .is_some_and(|rect| rect_contains(rect, column, row))
        {
            return MenuOutcome::Consumed;
        }
        self.close_menu();
        MenuOutcome::Ignored
    }

    /// Keyboard navigation while the dropdown is open.
    pub fn handle_key(&mut self, code: KeyCode) -> MenuOutcome {
        if !self.menu_open {
            return MenuOutcome::Ignored;
        }
        match code {
            KeyCode::Esc => self.close_menu(),
            KeyCode::Up => self.step_selection(false),
            KeyCode::Down => self.step_selection(true),
            KeyCode::Enter => return self.activate(self.selected),
            _ => {}
        }
        MenuOutcome::Consumed
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, active_app: Option<&str>) {
        self.anchor_rect = None;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let bar = Style::default()
            .fg(theme::menubar_fg())
            .bg(theme::menubar_bg());
        frame.fill(Rect { height: 1, ..area }, bar);
        let max_x = area.x.saturating_add(area.width);
        let y = area.y;
        let mut x = area.x;

        let anchor_width = APP_MENU_LABEL.chars().count() as u16;
        let anchor_style = if self.menu_open {
            bar.bg(theme::menubar_active_bg())
        } else {
            bar
        };
        frame.set_string(x, y, APP_MENU_LABEL, anchor_style);
        self.anchor_rect = Some(Rect {
            x,
            y,
            width: anchor_width.min(area.width),
            height: 1,
        });
        x = x.saturating_add(anchor_width + 1);

        if let Some(name) = active_app {
            frame.set_string(x, y, name, bar.add_modifier(Modifier::BOLD));
            x = x.saturating_add(name.chars().count() as u16 + 2);
        }
        for title in MENU_TITLES {
            if x >= max_x {
                break;
            }
            frame.set_string(x, y, title, bar);
            x = x.saturating_add(title.chars().count() as u16 + 2);
        }

        // status items, right aligned: wifi, battery, clock
        let battery_label = self.battery.label();
        let clock_label = self.clock.label();
        let status_width = (WIFI_LABEL.chars().count()
            + 2
            + 2
            + battery_label.chars().count()
            + 2
            + clock_label.chars().count()
            + 1) as u16;
        if status_width >= area.width.saturating_sub(x - area.x) {
            return;
        }
        let mut sx = max_x - status_width;
        frame.set_string(sx, y, WIFI_LABEL, bar);
        sx += WIFI_LABEL.chars().count() as u16 + 2;
        frame.set_string(
            sx,
            y,
            "▮",
            bar.fg(theme::battery_level(self.battery.level())),
        );
        sx += 2;
        frame.set_string(sx, y, &battery_label, bar);
        sx += battery_label.chars().count() as u16 + 2;
        frame.set_string(sx, y, clock_label, bar);
    }

    /// Draws the open dropdown below the app menu. Called after windows are
    /// drawn so it stays on top.
    pub fn render_dropdown(&mut self, frame: &mut UiFrame<'_>, bounds: Rect) {
        self.dropdown_rect = None;
        self.item_hits.clear();
        if !self.menu_open {
            return;
        }
        let Some(anchor) = self.anchor_rect else {
            return;
        };
        let label_width = APP_MENU
            .iter()
            .filter_map(|item| match item {
                MenuItem::Entry(label, _) => Some(label.chars().count() as u16),
                MenuItem::Separator => None,
            })
            .max()
            .unwrap_or(1);
        let x = anchor.x;
        let y = anchor.y.saturating_add(1);
        let max_x = bounds.x.saturating_add(bounds.width);
        let max_y = bounds.y.saturating_add(bounds.height);
        let width = (label_width + 4).min(max_x.saturating_sub(x));
        let height = (APP_MENU.len() as u16).min(max_y.saturating_sub(y));
        if width == 0 || height == 0 {
            return;
        }
        let rect = Rect {
            x,
            y,
            width,
            height,
        };
        let menu_style = Style::default().fg(theme::menu_fg()).bg(theme::menu_bg());
        frame.fill(rect, menu_style);
        for (index, item) in APP_MENU.iter().enumerate().take(height as usize) {
            let row = y + index as u16;
            match item {
                MenuItem::Separator => {
                    let line = "─".repeat(width as usize);
                    frame.set_string(x, row, &line, menu_style.fg(theme::menu_separator()));
                }
                MenuItem::Entry(label, _) => {
                    let style = if index == self.selected {
                        Style::default()
                            .fg(theme::menu_selected_fg())
                            .bg(theme::menu_selected_bg())
                    } else {
                        menu_style
                    };
                    let text = format!("  {label:<w$}", w = width.saturating_sub(2) as usize);
                    frame.set_string(x, row, &text, style);
                    self.item_hits.push((
                        Rect {
                            x,
                            y: row,
                            width,
                            height: 1,
                        },
                        index,
                    ));
                }
            }
        }
        self.dropdown_rect = Some(rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::row_text;
    use chrono::Utc;
    use ratatui::buffer::Buffer;

    fn menu_bar() -> MenuBar {
        let wall = Utc.with_ymd_and_hms(2025, 1, 21, 9, 30, 0).unwrap();
        MenuBar::new(Instant::now(), &wall)
    }

    fn render(bar: &mut MenuBar, area: Rect) -> Buffer {
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        bar.render(&mut frame, Rect { height: 1, ..area }, Some("Notes"));
        bar.render_dropdown(&mut frame, area);
        buffer
    }

    #[test]
    fn status_items_are_right_aligned() {
        let mut bar = menu_bar();
        let buffer = render(&mut bar, Rect::new(0, 0, 80, 3));
        let row = row_text(&buffer, 0);
        assert!(row.trim_end().ends_with("Tue Jan 21 09:30"));
        assert!(row.contains("85%"));
        assert!(row.contains("Wi-Fi"));
        assert!(row.contains("Notes"));
    }

    #[test]
    fn clicking_anchor_toggles_dropdown() {
        let mut bar = menu_bar();
        render(&mut bar, Rect::new(0, 0, 80, 20));
        assert_eq!(bar.handle_mouse_down(1, 0), MenuOutcome::Consumed);
        assert!(bar.is_menu_open());
        let buffer = render(&mut bar, Rect::new(0, 0, 80, 20));
        assert!(row_text(&buffer, 1).contains("About This Mac"));
        assert_eq!(bar.handle_mouse_down(1, 0), MenuOutcome::Consumed);
        assert!(!bar.is_menu_open());
    }

    #[test]
    fn clicking_item_activates_and_closes() {
        let mut bar = menu_bar();
        bar.open_menu();
        render(&mut bar, Rect::new(0, 0, 80, 20));
        // row 1 + index 8 = "Restart..."
        assert_eq!(
            bar.handle_mouse_down(3, 9),
            MenuOutcome::Activated(MenuAction::Restart)
        );
        assert!(!bar.is_menu_open());
    }

    #[test]
    fn separator_click_keeps_menu_open() {
        let mut bar = menu_bar();
        bar.open_menu();
        render(&mut bar, Rect::new(0, 0, 80, 20));
        assert_eq!(bar.handle_mouse_down(3, 4), MenuOutcome::Consumed);
        assert!(bar.is_menu_open());
    }

    #[test]
    fn click_outside_closes_and_passes_through() {
        let mut bar = menu_bar();
        bar.open_menu();
        render(&mut bar, Rect::new(0, 0, 80, 20));
        assert_eq!(bar.handle_mouse_down(60, 15), MenuOutcome::Ignored);
        assert!(!bar.is_menu_open());
    }

    #[test]
    fn keyboard_skips_separators() {
        let mut bar = menu_bar();
        bar.open_menu();
        bar.handle_key(KeyCode::Down);
        bar.handle_key(KeyCode::Down);
        bar.handle_key(KeyCode::Down);
        assert_eq!(
            bar.selected_item(),
            Some(MenuItem::Entry("Recent Items", MenuAction::RecentItems))
        );
        bar.handle_key(KeyCode::Up);
        bar.handle_key(KeyCode::Up);
        bar.handle_key(KeyCode::Up);
        bar.handle_key(KeyCode::Up);
        assert_eq!(
            bar.selected_item(),
            Some(MenuItem::Entry("Log Out...", MenuAction::LogOut))
        );
        assert_eq!(
            bar.handle_key(KeyCode::Enter),
            MenuOutcome::Activated(MenuAction::LogOut)
        );
        assert_eq!(bar.handle_key(KeyCode::Enter), MenuOutcome::Ignored);
    }

    #[test]
    fn shutdown_stops_clock() {
        let mut bar = menu_bar();
        assert!(bar.clock().is_running());
        bar.shutdown();
        assert!(!bar.clock().is_running());
    }
}
