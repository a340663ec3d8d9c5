//! In-memory log sink plus the overlay that displays it.
//!
//! The terminal is in raw mode on the alternate screen while the desktop
//! runs, so tracing output cannot go to stderr. Lines are collected in a
//! bounded ring instead and shown on demand (F12).

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use crossterm::event::{Event, KeyCode, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::components::{Component, ComponentContext};
use crate::constants::DEBUG_LOG_MAX_LINES;
use crate::theme;
use crate::ui::UiFrame;

static GLOBAL_LOG: OnceLock<DebugLogHandle> = OnceLock::new();

pub fn set_global_debug_log(handle: DebugLogHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_debug_log() -> Option<DebugLogHandle> {
    GLOBAL_LOG.get().cloned()
}

#[derive(Debug)]
struct DebugLogBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl DebugLogBuffer {
    fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

#[derive(Clone, Debug)]
pub struct DebugLogHandle {
    inner: Arc<Mutex<DebugLogBuffer>>,
}

impl DebugLogHandle {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DebugLogBuffer::new(max_lines))),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut buffer) = self.inner.lock() {
            buffer.push_line(line.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|buffer| buffer.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the retained lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|buffer| buffer.lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn writer(&self) -> DebugLogWriter {
        DebugLogWriter::new(self.clone())
    }
}

impl Default for DebugLogHandle {
    fn default() -> Self {
        Self::new(DEBUG_LOG_MAX_LINES)
    }
}

/// `io::Write` adapter that pushes one log line per newline.
#[derive(Debug)]
pub struct DebugLogWriter {
    handle: DebugLogHandle,
    pending: Vec<u8>,
}

impl DebugLogWriter {
    pub fn new(handle: DebugLogHandle) -> Self {
        Self {
            handle,
            pending: Vec::new(),
        }
    }

    fn push_complete_lines(&mut self) {
        let Some(pos) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return;
        };
        let drained: Vec<u8> = self.pending.drain(..=pos).collect();
        for line in String::from_utf8_lossy(&drained).split('\n') {
            if !line.is_empty() {
                self.handle.push(line.trim_end_matches('\r').to_string());
            }
        }
    }
}

impl Write for DebugLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.push_complete_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.push_complete_lines();
        if !self.pending.is_empty() {
            let rest = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            self.handle.push(rest);
        }
        Ok(())
    }
}

impl Drop for DebugLogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Scrollable view over a [`DebugLogHandle`]. Follows the tail until the
/// user scrolls up; scrolling back to the bottom resumes following.
#[derive(Debug)]
pub struct DebugLogComponent {
    handle: DebugLogHandle,
    /// Lines hidden below the viewport; `0` means following the tail.
    scroll_back: usize,
    last_view: usize,
}

impl DebugLogComponent {
    pub fn new(handle: DebugLogHandle) -> Self {
        Self {
            handle,
            scroll_back: 0,
            last_view: 0,
        }
    }

    pub fn is_following(&self) -> bool {
        self.scroll_back == 0
    }

    fn scroll(&mut self, delta: isize) {
        let max_back = self.handle.len().saturating_sub(self.last_view.max(1));
        let next = self.scroll_back as isize + delta;
        self.scroll_back = next.clamp(0, max_back as isize) as usize;
    }
}

impl Component for DebugLogComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width < 3 || area.height < 3 {
            return;
        }
        if ctx.overlay() {
            frame.render_widget(Clear, area);
        }
        let title = if self.is_following() {
            " Debug log (F12 to close) "
        } else {
            " Debug log (scrolled, End to follow) "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(theme::muted_fg()))
            .title_style(Style::default().add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = self.handle.lines();
        let view = inner.height as usize;
        self.last_view = view;
        let max_back = lines.len().saturating_sub(view);
        self.scroll_back = self.scroll_back.min(max_back);
        let end = lines.len() - self.scroll_back;
        let start = end.saturating_sub(view);
        let text = Text::from(
            lines[start..end]
                .iter()
                .map(|line| Line::from(line.as_str()))
                .collect::<Vec<_>>(),
        );
        let paragraph = Paragraph::new(text).style(
            Style::default()
                .fg(theme::window_fg())
                .bg(theme::window_bg()),
        );
        frame.render_widget(paragraph, inner);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        let page = self.last_view.max(1) as isize;
        match event {
            Event::Key(key) => {
                match key.code {
                    KeyCode::Up => self.scroll(1),
                    KeyCode::Down => self.scroll(-1),
                    KeyCode::PageUp => self.scroll(page),
                    KeyCode::PageDown => self.scroll(-page),
                    KeyCode::Home => self.scroll(isize::MAX / 2),
                    KeyCode::End => self.scroll_back = 0,
                    _ => return false,
                }
                true
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => {
                    self.scroll(3);
                    true
                }
                MouseEventKind::ScrollDown => {
                    self.scroll(-3);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}
