//! A desktop skin for the terminal: a menu bar, a dock and floating windows
//! hosting small mock applications, driven by a focus-aware window manager.

pub mod apps;
pub mod components;
pub mod config;
pub mod constants;
pub mod desktop;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod runner;
pub mod shell;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;
