use std::io;

use thiserror::Error;

/// Errors that can stop the desktop from running.
///
/// Window-manager operations never produce these; unknown ids are absorbed
/// as no-ops. Only terminal I/O and startup configuration can fail.
#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("terminal i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("terminal backend error: {0}")]
    Backend(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}
