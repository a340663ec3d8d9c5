use std::time::Duration;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use crate::error::DesktopError;

#[derive(Parser, Debug)]
#[command(
    name = "term-desk",
    version = env!("CARGO_PKG_VERSION"),
    about = "A desktop skin with draggable windows, rendered in the terminal"
)]
pub struct Cli {
    /// Input poll interval; the desktop redraws whenever a poll times out.
    #[arg(long = "tick-ms", value_name = "MILLIS", default_value_t = 16)]
    pub tick_ms: u64,

    /// Keep a few cells of every dragged window inside the desktop area.
    #[arg(long = "clamp-windows")]
    pub clamp_windows: bool,

    /// Application to open at startup (repeatable), e.g. `--open notes`.
    #[arg(long = "open", value_name = "APP")]
    pub open: Vec<String>,

    /// Maximum log level written to the debug log (off, error, warn, info, debug, trace).
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Validated runtime configuration derived from [`Cli`].
#[derive(Debug, Clone)]
pub struct DesktopConfig {
    pub poll_interval: Duration,
    pub clamp_windows: bool,
    pub startup_apps: Vec<String>,
    pub log_level: LevelFilter,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(16),
            clamp_windows: false,
            startup_apps: Vec::new(),
            log_level: LevelFilter::INFO,
        }
    }
}

impl TryFrom<&Cli> for DesktopConfig {
    type Error = DesktopError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if !(5..=1000).contains(&cli.tick_ms) {
            return Err(DesktopError::Config(
                "tick-ms must be between 5 and 1000".to_string(),
            ));
        }
        let log_level = cli
            .log_level
            .parse::<LevelFilter>()
            .map_err(|_| DesktopError::Config(format!("unknown log level `{}`", cli.log_level)))?;
        Ok(Self {
            poll_interval: Duration::from_millis(cli.tick_ms),
            clamp_windows: cli.clamp_windows,
            startup_apps: cli.open.clone(),
            log_level,
        })
    }
}
