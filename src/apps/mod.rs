//! Static catalog of the applications the desktop can open.
//!
//! Each [`Application`] carries display metadata and a content provider: a
//! plain function that mounts the application's body. Bodies form a closed
//! set ([`AppBody`]), so rendering and event routing dispatch over an enum
//! instead of arbitrary trait objects.

pub mod finder;
pub mod notes;
pub mod safari;

use crossterm::event::Event;
use ratatui::layout::Rect;
use thiserror::Error;

use crate::components::{Component, ComponentContext};
use crate::constants::{FALLBACK_WINDOW_HEIGHT, FALLBACK_WINDOW_WIDTH};
use crate::ui::UiFrame;

pub use finder::FinderComponent;
pub use notes::NotesComponent;
pub use safari::SafariComponent;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("{app} could not be loaded: {reason}")]
    Unavailable { app: &'static str, reason: String },
}

/// Mounts the body of an application window.
pub type ContentProvider = fn() -> Result<AppBody, ContentError>;

#[derive(Debug, Clone, Copy)]
pub struct Application {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub default_width: Option<u16>,
    pub default_height: Option<u16>,
    pub provider: ContentProvider,
}

impl Application {
    /// Initial window size, falling back to a fixed size when undeclared.
    pub fn window_size(&self) -> (u16, u16) {
        (
            self.default_width.unwrap_or(FALLBACK_WINDOW_WIDTH),
            self.default_height.unwrap_or(FALLBACK_WINDOW_HEIGHT),
        )
    }

    pub fn mount(&self) -> Result<AppBody, ContentError> {
        (self.provider)()
    }
}

/// Read-only application catalog, in registration order.
#[derive(Debug, Clone)]
pub struct AppRegistry {
    apps: Vec<Application>,
}

impl AppRegistry {
    /// Builds a registry; when two entries share an id the first one wins.
    pub fn new(apps: impl IntoIterator<Item = Application>) -> Self {
        let mut unique: Vec<Application> = Vec::new();
        for app in apps {
            if unique.iter().any(|existing| existing.id == app.id) {
                tracing::warn!(app_id = app.id, "ignoring duplicate application id");
                continue;
            }
            unique.push(app);
        }
        Self { apps: unique }
    }

    pub fn builtin() -> Self {
        Self::new([
            Application {
                id: "finder",
                name: "Finder",
                icon: "◧",
                default_width: Some(64),
                default_height: Some(18),
                provider: || Ok(AppBody::Finder(FinderComponent::new())),
            },
            Application {
                id: "notes",
                name: "Notes",
                icon: "✎",
                default_width: Some(56),
                default_height: Some(16),
                provider: || Ok(AppBody::Notes(NotesComponent::new())),
            },
            Application {
                id: "safari",
                name: "Safari",
                icon: "◎",
                default_width: Some(72),
                default_height: Some(20),
                provider: || Ok(AppBody::Safari(SafariComponent::new())),
            },
        ])
    }

    pub fn get(&self, id: &str) -> Option<&Application> {
        self.apps.iter().find(|app| app.id == id)
    }

    pub fn list(&self) -> &[Application] {
        &self.apps
    }
}

impl Default for AppRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Mounted body of an application window.
#[derive(Debug)]
pub enum AppBody {
    Finder(FinderComponent),
    Notes(NotesComponent),
    Safari(SafariComponent),
}

impl Component for AppBody {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        match self {
            AppBody::Finder(finder) => finder.render(frame, area, ctx),
            AppBody::Notes(notes) => notes.render(frame, area, ctx),
            AppBody::Safari(safari) => safari.render(frame, area, ctx),
        }
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        match self {
            AppBody::Finder(finder) => finder.handle_event(event, ctx),
            AppBody::Notes(notes) => notes.handle_event(event, ctx),
            AppBody::Safari(safari) => safari.handle_event(event, ctx),
        }
    }
}
