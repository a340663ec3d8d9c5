use std::time::{Duration, Instant};

use chrono::Local;
use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::desktop::Desktop;
use crate::drivers::InputDriver;
use crate::error::DesktopError;
use crate::event_loop::{ControlFlow, EventLoop};
use crate::ui::UiFrame;

/// Runs the desktop until it asks to quit.
///
/// Input events are routed to the desktop as they arrive; every idle pass
/// advances the shell clock and battery and redraws the frame. Mouse capture
/// is switched on here and left for the caller to switch off when restoring
/// the terminal.
pub fn run_desktop<B, D>(
    terminal: &mut Terminal<B>,
    driver: D,
    desktop: &mut Desktop,
    poll_interval: Duration,
) -> Result<(), DesktopError>
where
    B: Backend,
    D: InputDriver,
{
    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;
    let mut backend_error: Option<String> = None;

    event_loop.run(|_, event| {
        match event {
            Some(evt) => {
                desktop.handle_event(&evt);
            }
            None => {
                desktop.tick(Instant::now(), &Local::now());
                let drawn = terminal.draw(|frame| {
                    let mut ui = UiFrame::new(frame);
                    desktop.render(&mut ui);
                });
                if let Err(err) = drawn {
                    backend_error = Some(err.to_string());
                    return Ok(ControlFlow::Quit);
                }
            }
        }
        Ok(if desktop.should_quit() {
            ControlFlow::Quit
        } else {
            ControlFlow::Continue
        })
    })?;

    desktop.shutdown();
    match backend_error {
        Some(message) => Err(DesktopError::Backend(message)),
        None => {
            tracing::info!("desktop exited");
            Ok(())
        }
    }
}
