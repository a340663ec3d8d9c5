use std::io;

use clap::Parser;
use crossterm::event::DisableMouseCapture;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use term_desk::apps::AppRegistry;
use term_desk::components::DebugLogHandle;
use term_desk::components::debug_log::set_global_debug_log;
use term_desk::config::{Cli, DesktopConfig};
use term_desk::desktop::Desktop;
use term_desk::drivers::console::ConsoleInputDriver;
use term_desk::error::DesktopError;
use term_desk::runner::run_desktop;
use term_desk::tracing_sub;

fn main() -> Result<(), DesktopError> {
    let cli = Cli::parse();
    let config = DesktopConfig::try_from(&cli)?;

    let log = DebugLogHandle::default();
    set_global_debug_log(log.clone());
    tracing_sub::init(config.log_level);

    let mut desktop = Desktop::new(AppRegistry::builtin(), &config).with_debug_log(log);
    desktop.open_startup_apps(&config);

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    terminal::enable_raw_mode()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_desktop(
        &mut terminal,
        ConsoleInputDriver::new(),
        &mut desktop,
        config.poll_interval,
    );

    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}
