use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseEventKind,
};

use super::InputDriver;

/// Reads crossterm events from the controlling terminal.
///
/// Key releases are dropped and Shift+Tab is reported as BackTab on every
/// platform. Bursts of pointer motion are coalesced so a fast drag produces
/// one window move per frame rather than one per reported cell.
#[derive(Debug, Default)]
pub struct ConsoleInputDriver {
    pending: VecDeque<Event>,
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_normalized(&mut self) -> io::Result<Event> {
        loop {
            if let Some(evt) = normalize(crossterm::event::read()?) {
                return Ok(evt);
            }
        }
    }
}

fn normalize(evt: Event) -> Option<Event> {
    match evt {
        Event::Key(mut key) => {
            if key.kind == KeyEventKind::Release {
                return None;
            }
            if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
                key.code = KeyCode::BackTab;
                key.modifiers.remove(KeyModifiers::SHIFT);
            }
            Some(Event::Key(key))
        }
        other => Some(other),
    }
}

fn is_motion(evt: &Event) -> bool {
    matches!(
        evt,
        Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Drag(_) | MouseEventKind::Moved)
    )
}

/// Drop a motion event that is immediately superseded by another one of
/// the same kind.
fn coalesce(queue: &mut VecDeque<Event>, next: Event) {
    if is_motion(&next)
        && let Some(last) = queue.back()
        && is_motion(last)
        && let (Event::Mouse(prev), Event::Mouse(cur)) = (last, &next)
        && prev.kind == cur.kind
    {
        queue.pop_back();
    }
    queue.push_back(next);
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.pending.is_empty() {
            return Ok(true);
        }
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        if self.pending.is_empty() {
            let first = self.read_normalized()?;
            coalesce(&mut self.pending, first);
            while crossterm::event::poll(Duration::ZERO)? {
                let next = self.read_normalized()?;
                let was_motion = is_motion(&next);
                coalesce(&mut self.pending, next);
                if !was_motion {
                    break;
                }
            }
        }
        self.pending
            .pop_front()
            .ok_or_else(|| io::Error::other("input queue empty"))
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            crossterm::execute!(io::stdout(), EnableMouseCapture)
        } else {
            crossterm::execute!(io::stdout(), DisableMouseCapture)
        }
    }
}
