//! Safari: a tabbed browser mock.
//!
//! Pages cannot be embedded in a terminal, so a loaded tab shows its URL
//! and can hand it to the system browser instead.

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use thiserror::Error;

use crate::components::{Component, ComponentContext};
use crate::theme;
use crate::ui::UiFrame;

pub const BLANK_URL: &str = "about:blank";
const SEARCH_URL: &str = "https://www.google.com/search?q=";

pub const SHORTCUTS: [(&str, &str); 6] = [
    ("Wikipedia", "https://wikipedia.org"),
    ("MDN", "https://developer.mozilla.org"),
    ("CSS Tricks", "https://css-tricks.com"),
    ("CodePen", "https://codepen.io"),
    ("Dev.to", "https://dev.to"),
    ("Archive.org", "https://archive.org"),
];

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("nothing to open on a blank page")]
    BlankPage,
    #[error("failed to launch system browser: {0}")]
    Launch(#[from] std::io::Error),
}

/// Turns address-bar input into a URL.
///
/// Explicit `http://`, `https://` and `about:` inputs are kept; anything
/// containing a dot is treated as a host; everything else is a web search.
/// Returns `None` for empty input.
pub fn normalize_url(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if input.starts_with("http://") || input.starts_with("https://") || input.starts_with("about:")
    {
        return Some(input.to_string());
    }
    if input.contains('.') {
        return Some(format!("https://{input}"));
    }
    Some(format!("{SEARCH_URL}{}", encode_component(input)))
}

/// Percent-encodes everything outside the URI-component unreserved set.
fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub title: String,
    pub url: String,
    pub load_error: bool,
}

impl Tab {
    fn blank(title: &str) -> Self {
        Self {
            title: title.to_string(),
            url: BLANK_URL.to_string(),
            load_error: false,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.url == BLANK_URL
    }
}

/// Launches a URL outside the terminal.
pub type Launcher = fn(&str) -> std::io::Result<()>;

fn system_browser(url: &str) -> std::io::Result<()> {
    webbrowser::open(url)
}

#[derive(Debug)]
pub struct SafariComponent {
    tabs: Vec<Tab>,
    active: usize,
    address: String,
    retry_count: u32,
    launcher: Launcher,
}

impl SafariComponent {
    pub fn new() -> Self {
        Self::with_launcher(system_browser)
    }

    pub fn with_launcher(launcher: Launcher) -> Self {
        Self {
            tabs: vec![Tab::blank("Start Page")],
            active: 0,
            address: String::new(),
            retry_count: 0,
            launcher,
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_tab(&self) -> &Tab {
        &self.tabs[self.active]
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    fn sync_address(&mut self) {
        let tab = &self.tabs[self.active];
        self.address = if tab.is_blank() {
            String::new()
        } else {
            tab.url.clone()
        };
    }

    pub fn new_tab(&mut self) {
        self.tabs.push(Tab::blank("New Tab"));
        self.active = self.tabs.len() - 1;
        self.sync_address();
    }

    /// Closes the tab at `index`. The last remaining tab is never closed;
    /// closing the active tab activates the last tab left.
    pub fn close_tab(&mut self, index: usize) {
        if self.tabs.len() <= 1 || index >= self.tabs.len() {
            return;
        }
        self.tabs.remove(index);
        if index == self.active {
            self.active = self.tabs.len() - 1;
        } else if index < self.active {
            self.active -= 1;
        }
        self.sync_address();
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.active = index;
            self.sync_address();
        }
    }

    fn cycle_tab(&mut self, forward: bool) {
        let len = self.tabs.len();
        let next = if forward {
            (self.active + 1) % len
        } else {
            (self.active + len - 1) % len
        };
        self.select_tab(next);
    }

    /// Loads `input` into the active tab. Empty input is ignored.
    pub fn navigate(&mut self, input: &str) {
        let Some(url) = normalize_url(input) else {
            return;
        };
        let tab = &mut self.tabs[self.active];
        tab.url = url.clone();
        tab.title = url.clone();
        tab.load_error = false;
        self.retry_count = 0;
        self.address = url;
        tracing::debug!(url = %self.address, "safari: navigate");
    }

    pub fn reload(&mut self) {
        if self.active_tab().is_blank() {
            return;
        }
        self.retry_count += 1;
        self.tabs[self.active].load_error = false;
        tracing::debug!(retry = self.retry_count, "safari: reload");
    }

    /// Hands the active page to the system browser; a failure marks the
    /// tab's load error.
    pub fn open_external(&mut self) -> Result<(), BrowserError> {
        let tab = &self.tabs[self.active];
        if tab.is_blank() {
            return Err(BrowserError::BlankPage);
        }
        if let Err(err) = (self.launcher)(&tab.url) {
            self.tabs[self.active].load_error = true;
            tracing::warn!(error = %err, "safari: could not open system browser");
            return Err(BrowserError::Launch(err));
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match code {
                KeyCode::Char('t') => self.new_tab(),
                KeyCode::Char('x') => self.close_tab(self.active),
                KeyCode::Char('r') => self.reload(),
                KeyCode::Char('o') => {
                    // failures are recorded on the tab
                    let _ = self.open_external();
                }
                KeyCode::Left => self.cycle_tab(false),
                KeyCode::Right => self.cycle_tab(true),
                _ => return false,
            }
            return true;
        }
        match code {
            KeyCode::Char(ch) if self.address.is_empty() && self.active_tab().is_blank() => {
                match ch.to_digit(10).map(|d| d as usize) {
                    Some(n @ 1..=6) => {
                        let url = SHORTCUTS[n - 1].1;
                        self.navigate(url);
                    }
                    _ => self.address.push(ch),
                }
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::ALT) => self.address.push(ch),
            KeyCode::Backspace => {
                self.address.pop();
            }
            KeyCode::Enter => {
                let input = self.address.clone();
                self.navigate(&input);
            }
            KeyCode::Esc if !self.address.is_empty() => self.sync_address(),
            _ => return false,
        }
        true
    }

    /// Maps a tab-strip column to what sits there, matching the layout
    /// drawn by `render`.
    fn tab_hit(&self, column: u16) -> Option<TabStripHit> {
        let mut x = 0u16;
        for (index, tab) in self.tabs.iter().enumerate() {
            let width = tab_label(tab).chars().count() as u16;
            if column >= x && column < x + width {
                // the close glyph is the last cell of the label
                return Some(if column + 1 == x + width {
                    TabStripHit::Close(index)
                } else {
                    TabStripHit::Select(index)
                });
            }
            x += width + 1;
        }
        (column == x).then_some(TabStripHit::NewTab)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TabStripHit {
    Select(usize),
    Close(usize),
    NewTab,
}

impl Default for SafariComponent {
    fn default() -> Self {
        Self::new()
    }
}

fn tab_label(tab: &Tab) -> String {
    let title: String = tab.title.chars().take(18).collect();
    format!(" {title} ✕")
}

impl Component for SafariComponent {
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
        let muted = base.fg(theme::muted_fg());
        frame.fill(area, base);

        // tab strip
        frame.fill(Rect { height: 1, ..area }, bar);
        let mut x = area.x;
        for (index, tab) in self.tabs.iter().enumerate() {
            let label = tab_label(tab);
            let style = if index == self.active {
                base.add_modifier(Modifier::BOLD)
            } else {
                bar
            };
            frame.set_string(x, area.y, &label, style);
            x = x.saturating_add(label.chars().count() as u16 + 1);
        }
        frame.set_string(x, area.y, "+", bar);

        // address bar
        let address_y = area.y + 1;
        frame.fill(
            Rect {
                y: address_y,
                height: 1,
                ..area
            },
            bar,
        );
        let shown = if self.address.is_empty() && !ctx.focused() {
            "Search or enter website name".to_string()
        } else if ctx.focused() {
            format!("{}▏", self.address)
        } else {
            self.address.clone()
        };
        frame.set_string(area.x + 1, address_y, "⟳ ", bar);
        frame.set_string(area.x + 3, address_y, &shown, bar);

        let body_y = area.y + 3;
        let tab = self.active_tab();
        if tab.is_blank() {
            frame.set_string(area.x + 2, body_y, "Favorites", base.add_modifier(Modifier::BOLD));
            for (idx, (name, url)) in SHORTCUTS.iter().enumerate() {
                let line = format!("{}  {:<12} {}", idx + 1, name, url);
                frame.set_string(area.x + 2, body_y + 2 + idx as u16, &line, base);
            }
            return;
        }
        if tab.load_error {
            frame.set_string(
                area.x + 2,
                body_y,
                "This page could not be opened.",
                base.fg(theme::error_fg()),
            );
            frame.set_string(area.x + 2, body_y + 1, "Press Ctrl+R to retry.", muted);
        } else {
            frame.set_string(area.x + 2, body_y, &tab.url, base.add_modifier(Modifier::BOLD));
            frame.set_string(
                area.x + 2,
                body_y + 2,
                "Web pages cannot be shown here. Press Ctrl+O to open in your browser.",
                muted,
            );
        }
        if self.retry_count > 0 {
            frame.set_string(
                area.x + 2,
                body_y + 4,
                &format!("Retries: {}", self.retry_count),
                muted,
            );
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                self.handle_key(key.code, key.modifiers)
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if mouse.row != 0 {
                    return false;
                }
                match self.tab_hit(mouse.column) {
                    Some(TabStripHit::Select(index)) => self.select_tab(index),
                    Some(TabStripHit::Close(index)) => self.close_tab(index),
                    Some(TabStripHit::NewTab) => self.new_tab(),
                    None => return false,
                }
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseEvent};
    use std::io;

    fn ctrl(ch: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
    }

    fn failing_launcher(_: &str) -> io::Result<()> {
        Err(io::Error::other("no browser"))
    }

    fn ok_launcher(_: &str) -> io::Result<()> {
        Ok(())
    }

    #[test]
    fn normalize_keeps_schemes() {
        assert_eq!(
            normalize_url("http://example.com").as_deref(),
            Some("http://example.com")
        );
        assert_eq!(normalize_url("about:blank").as_deref(), Some("about:blank"));
    }

    #[test]
    fn normalize_prefixes_dotted_hosts() {
        assert_eq!(
            normalize_url("rust-lang.org").as_deref(),
            Some("https://rust-lang.org")
        );
    }

    #[test]
    fn normalize_searches_everything_else() {
        assert_eq!(
            normalize_url("rust ratatui").as_deref(),
            Some("https://www.google.com/search?q=rust%20ratatui")
        );
        assert_eq!(
            normalize_url("a&b").as_deref(),
            Some("https://www.google.com/search?q=a%26b")
        );
        assert_eq!(normalize_url("   "), None);
    }

    #[test]
    fn starts_with_single_start_page() {
        let safari = SafariComponent::new();
        assert_eq!(safari.tabs().len(), 1);
        assert_eq!(safari.active_tab().title, "Start Page");
        assert!(safari.active_tab().is_blank());
        assert_eq!(safari.address(), "");
    }

    #[test]
    fn last_tab_is_never_closed() {
        let mut safari = SafariComponent::new();
        safari.handle_event(&ctrl('x'), &ComponentContext::default());
        assert_eq!(safari.tabs().len(), 1);
    }

    #[test]
    fn closing_active_tab_activates_last_remaining() {
        let mut safari = SafariComponent::new();
        safari.new_tab();
        safari.new_tab();
        safari.select_tab(0);
        safari.close_tab(0);
        assert_eq!(safari.tabs().len(), 2);
        assert_eq!(safari.active_index(), 1);

        safari.select_tab(0);
        safari.close_tab(1);
        assert_eq!(safari.active_index(), 0);
    }

    #[test]
    fn navigate_updates_tab_and_resets_retries() {
        let mut safari = SafariComponent::with_launcher(ok_launcher);
        for ch in "docs.rs".chars() {
            safari.handle_event(
                &Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)),
                &ComponentContext::default(),
            );
        }
        safari.handle_event(
            &Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            &ComponentContext::default(),
        );
        assert_eq!(safari.active_tab().url, "https://docs.rs");
        assert_eq!(safari.active_tab().title, "https://docs.rs");
        safari.reload();
        safari.reload();
        assert_eq!(safari.retry_count(), 2);
        safari.navigate("example.org");
        assert_eq!(safari.retry_count(), 0);
    }

    #[test]
    fn digit_on_start_page_opens_shortcut() {
        let mut safari = SafariComponent::new();
        safari.handle_event(
            &Event::Key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE)),
            &ComponentContext::default(),
        );
        assert_eq!(safari.active_tab().url, "https://developer.mozilla.org");
    }

    #[test]
    fn failed_launch_marks_load_error_until_reload() {
        let mut safari = SafariComponent::with_launcher(failing_launcher);
        assert!(matches!(safari.open_external(), Err(BrowserError::BlankPage)));
        safari.navigate("example.org");
        assert!(matches!(safari.open_external(), Err(BrowserError::Launch(_))));
        assert!(safari.active_tab().load_error);
        safari.handle_event(&ctrl('r'), &ComponentContext::default());
        assert!(!safari.active_tab().load_error);
        assert_eq!(safari.retry_count(), 1);
    }

    #[test]
    fn switching_tabs_restores_address() {
        let mut safari = SafariComponent::new();
        safari.navigate("example.org");
        safari.new_tab();
        assert_eq!(safari.address(), "");
        safari.handle_event(
            &Event::Key(KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL)),
            &ComponentContext::default(),
        );
        assert_eq!(safari.address(), "https://example.org");
    }

    fn click_strip(safari: &mut SafariComponent, column: u16) -> bool {
        safari.handle_event(
            &Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row: 0,
                modifiers: KeyModifiers::NONE,
            }),
            &ComponentContext::default(),
        )
    }

    #[test]
    fn tab_strip_clicks_open_select_and_close_tabs() {
        let mut safari = SafariComponent::new();
        let first_width = tab_label(safari.active_tab()).chars().count() as u16;

        // "+" sits one cell past the last label
        assert!(click_strip(&mut safari, first_width + 1));
        assert_eq!(safari.tabs().len(), 2);
        assert_eq!(safari.active_index(), 1);

        assert!(click_strip(&mut safari, 1));
        assert_eq!(safari.active_index(), 0);

        // the close glyph of the first tab
        assert!(click_strip(&mut safari, first_width - 1));
        assert_eq!(safari.tabs().len(), 1);
        assert_eq!(safari.active_tab().title, "New Tab");

        assert!(!click_strip(&mut safari, 60));
    }
}
