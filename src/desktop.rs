//! The desktop controller.
//!
//! [`Desktop`] owns every piece of UI state: the window manager, the drag
//! session, the mounted application bodies and the shell chrome. It turns
//! terminal events into window-manager calls and renders the whole screen.
//!
//! Window geometry is kept relative to the viewport (the rows between menu
//! bar and dock). Pointer positions are translated into that space before
//! they reach the window manager or the drag controller.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::time::Instant;

use chrono::{DateTime, Local, TimeZone};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::apps::{AppBody, AppRegistry, ContentError};
use crate::components::{Component, ComponentContext, DebugLogComponent, DebugLogHandle};
use crate::config::DesktopConfig;
use crate::shell::{self, Dock, MenuAction, MenuBar, MenuOutcome, ShellLayout, rect_contains};
use crate::theme;
use crate::ui::UiFrame;
use crate::window::decorator::{HeaderAction, TrafficLightDecorator, WindowDecorator};
use crate::window::{DragController, FloatRect, WindowId, WindowManager};

pub const FALLBACK_MESSAGE: &str = "This application could not be displayed";

/// Name shown in the menu bar when no window holds focus.
const IDLE_APP_NAME: &str = "Finder";

#[derive(Debug)]
pub struct Desktop {
    wm: WindowManager,
    drag: DragController,
    bodies: BTreeMap<WindowId, Result<AppBody, ContentError>>,
    menu_bar: MenuBar,
    dock: Dock,
    decorator: Box<dyn WindowDecorator>,
    layout: ShellLayout,
    clamp_windows: bool,
    debug_log: Option<DebugLogComponent>,
    debug_log_visible: bool,
    last_menu_action: Option<MenuAction>,
    quit: bool,
}

impl Desktop {
    pub fn new(registry: AppRegistry, config: &DesktopConfig) -> Self {
        Self::with_clock(registry, config, Instant::now(), &Local::now())
    }

    /// Like [`Desktop::new`] with an explicit start time for the menu bar
    /// clock and battery.
    pub fn with_clock<Tz>(
        registry: AppRegistry,
        config: &DesktopConfig,
        now: Instant,
        wall: &DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            wm: WindowManager::new(registry),
            drag: DragController::new(),
            bodies: BTreeMap::new(),
            menu_bar: MenuBar::new(now, wall),
            dock: Dock::default(),
            decorator: Box::new(TrafficLightDecorator),
            layout: ShellLayout::default(),
            clamp_windows: config.clamp_windows,
            debug_log: None,
            debug_log_visible: false,
            last_menu_action: None,
            quit: false,
        }
    }

    pub fn with_debug_log(mut self, handle: DebugLogHandle) -> Self {
        self.debug_log = Some(DebugLogComponent::new(handle));
        self
    }

    pub fn window_manager(&self) -> &WindowManager {
        &self.wm
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn menu_bar(&self) -> &MenuBar {
        &self.menu_bar
    }

    pub fn layout(&self) -> ShellLayout {
        self.layout
    }

    pub fn body(&self, id: WindowId) -> Option<&Result<AppBody, ContentError>> {
        self.bodies.get(&id)
    }

    pub fn last_menu_action(&self) -> Option<MenuAction> {
        self.last_menu_action
    }

    pub fn is_debug_log_visible(&self) -> bool {
        self.debug_log_visible
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Stops the periodic shell tasks before the desktop is torn down.
    pub fn shutdown(&mut self) {
        self.menu_bar.shutdown();
    }

    /// Recomputes the screen split. Called on every render and on resize.
    pub fn set_area(&mut self, area: Rect) {
        self.layout = shell::split_area(area);
        let bounds = self.clamp_windows.then(|| self.local_viewport());
        self.drag.set_clamp_bounds(bounds);
    }

    fn local_viewport(&self) -> Rect {
        Rect {
            x: 0,
            y: 0,
            ..self.layout.viewport
        }
    }

    /// Screen cell to viewport-local coordinates.
    fn to_local(&self, column: u16, row: u16) -> (i32, i32) {
        (
            column as i32 - self.layout.viewport.x as i32,
            row as i32 - self.layout.viewport.y as i32,
        )
    }

    /// Opens an application, mounting its body the first time. Unknown ids
    /// return `None` and change nothing.
    pub fn open_app(&mut self, app_id: &str) -> Option<WindowId> {
        let app = self.wm.registry().get(app_id).copied()?;
        let id = self.wm.open(app_id)?;
        self.bodies.entry(id).or_insert_with(|| {
            let body = app.mount();
            if let Err(err) = &body {
                tracing::warn!(window_id = %id, app_id = app.id, error = %err, "content failed to mount");
            }
            body
        });
        Some(id)
    }

    pub fn close_window(&mut self, id: WindowId) -> bool {
        self.drag.interrupt(id);
        self.bodies.remove(&id);
        self.wm.close(id)
    }

    pub fn minimize_window(&mut self, id: WindowId) {
        self.drag.interrupt(id);
        self.wm.minimize(id);
    }

    pub fn toggle_maximize(&mut self, id: WindowId) -> bool {
        self.drag.interrupt(id);
        self.wm.toggle_maximize(id)
    }

    /// Opens every application named in `config.startup_apps`, in order.
    /// Unknown ids are skipped with a warning.
    pub fn open_startup_apps(&mut self, config: &DesktopConfig) -> Vec<WindowId> {
        let mut opened = Vec::new();
        for app_id in &config.startup_apps {
            match self.open_app(app_id) {
                Some(id) => opened.push(id),
                None => {
                    tracing::warn!(app_id = %app_id, "ignoring unknown startup application")
                }
            }
        }
        opened
    }

    pub fn move_window(&mut self, id: WindowId, x: i32, y: i32) {
        self.wm.move_window(id, x, y);
    }

    pub fn focus_window(&mut self, id: WindowId) {
        self.wm.focus(id);
    }

    /// Advances the clock and battery. Returns whether anything visible
    /// changed.
    pub fn tick<Tz>(&mut self, now: Instant, wall: &DateTime<Tz>) -> bool
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.menu_bar.tick(now, wall)
    }

    /// Routes one terminal event. Returns whether anything consumed it.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.set_area(Rect::new(0, 0, *width, *height));
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('q') {
            self.quit = true;
            return true;
        }
        if key.code == KeyCode::F(12) && self.debug_log.is_some() {
            self.debug_log_visible = !self.debug_log_visible;
            return true;
        }
        if self.debug_log_visible {
            if key.code == KeyCode::Esc {
                self.debug_log_visible = false;
                return true;
            }
            if let Some(log) = self.debug_log.as_mut() {
                return log.handle_event(&Event::Key(*key), &ComponentContext::new(true));
            }
        }
        if key.code == KeyCode::Esc && self.drag.abort(&mut self.wm) {
            return true;
        }
        match self.menu_bar.handle_key(key.code) {
            MenuOutcome::Ignored => {}
            MenuOutcome::Consumed => return true,
            MenuOutcome::Activated(action) => {
                self.last_menu_action = Some(action);
                return true;
            }
        }

        let focused = self.wm.focused();
        match key.code {
            KeyCode::Tab if !ctrl => {
                self.wm.cycle_focus(true);
                return true;
            }
            KeyCode::BackTab => {
                self.wm.cycle_focus(false);
                return true;
            }
            KeyCode::Char('w') if ctrl => {
                if let Some(id) = focused {
                    self.close_window(id);
                }
                return true;
            }
            KeyCode::Char('n') if ctrl => {
                if let Some(id) = focused {
                    self.minimize_window(id);
                }
                return true;
            }
            KeyCode::Char('f') if ctrl => {
                if let Some(id) = focused {
                    self.toggle_maximize(id);
                }
                return true;
            }
            _ => {}
        }

        let Some(id) = focused.filter(|id| self.wm.is_visible(*id)) else {
            return false;
        };
        match self.bodies.get_mut(&id) {
            Some(Ok(body)) => body.handle_event(&Event::Key(*key), &ComponentContext::new(true)),
            _ => false,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        let (column, row) = (mouse.column, mouse.row);
        let (local_x, local_y) = self.to_local(column, row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(mouse),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.drag.pointer_move(&mut self.wm, local_x, local_y)
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag.pointer_up(),
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                if self.debug_log_visible
                    && let Some(log) = self.debug_log.as_mut()
                {
                    return log.handle_event(&Event::Mouse(*mouse), &ComponentContext::new(true));
                }
                self.forward_to_body_under(mouse)
            }
            _ => false,
        }
    }

    fn pointer_down(&mut self, mouse: &MouseEvent) -> bool {
        let (column, row) = (mouse.column, mouse.row);
        match self.menu_bar.handle_mouse_down(column, row) {
            MenuOutcome::Ignored => {}
            MenuOutcome::Consumed => return true,
            MenuOutcome::Activated(action) => {
                self.last_menu_action = Some(action);
                return true;
            }
        }
        if rect_contains(self.layout.dock, column, row) {
            if let Some(app_id) = self.dock.hit_test(column, row) {
                self.open_app(app_id);
            }
            return true;
        }
        if !rect_contains(self.layout.viewport, column, row) {
            return false;
        }

        let (local_x, local_y) = self.to_local(column, row);
        let viewport = self.local_viewport();
        let Some(id) = self.wm.window_at(local_x, local_y, viewport) else {
            return false;
        };
        let Some(rect) = self.wm.effective_rect(id, viewport) else {
            return true;
        };
        let win_x = (local_x - rect.x) as u16;
        let win_y = (local_y - rect.y) as u16;
        // close and minimize leave the focus reference alone
        match self.decorator.header_action(rect.width, win_x, win_y) {
            Some(HeaderAction::Close) => {
                self.close_window(id);
            }
            Some(HeaderAction::Minimize) => self.minimize_window(id),
            Some(HeaderAction::Maximize) => {
                self.focus_window(id);
                self.toggle_maximize(id);
            }
            Some(HeaderAction::Drag) => {
                self.focus_window(id);
                self.drag.pointer_down(&self.wm, id, local_x, local_y);
            }
            None => {
                self.focus_window(id);
                self.forward_to_body(id, rect, mouse);
            }
        }
        true
    }

    fn forward_to_body_under(&mut self, mouse: &MouseEvent) -> bool {
        let (local_x, local_y) = self.to_local(mouse.column, mouse.row);
        let viewport = self.local_viewport();
        let Some(id) = self.wm.window_at(local_x, local_y, viewport) else {
            return false;
        };
        match self.wm.effective_rect(id, viewport) {
            Some(rect) => self.forward_to_body(id, rect, mouse),
            None => false,
        }
    }

    /// Delivers a mouse event to a window body in body-local coordinates.
    fn forward_to_body(&mut self, id: WindowId, rect: FloatRect, mouse: &MouseEvent) -> bool {
        let (local_x, local_y) = self.to_local(mouse.column, mouse.row);
        let content = self
            .decorator
            .content_rect(Rect::new(0, 0, rect.width, rect.height));
        let body_x = local_x - rect.x - content.x as i32;
        let body_y = local_y - rect.y - content.y as i32;
        if body_x < 0
            || body_y < 0
            || body_x >= content.width as i32
            || body_y >= content.height as i32
        {
            return false;
        }
        let focused = self.wm.focused() == Some(id);
        let Some(Ok(body)) = self.bodies.get_mut(&id) else {
            return false;
        };
        let localized = MouseEvent {
            column: body_x as u16,
            row: body_y as u16,
            ..*mouse
        };
        body.handle_event(&Event::Mouse(localized), &ComponentContext::new(focused))
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        self.set_area(frame.area());
        let layout = self.layout;

        render_wallpaper(frame, layout.viewport);
        self.render_windows(frame, layout.viewport);

        let active_app = self
            .wm
            .focused()
            .filter(|id| self.wm.is_visible(*id))
            .and_then(|id| self.wm.window(id))
            .and_then(|window| self.wm.registry().get(window.app_id()))
            .map_or(IDLE_APP_NAME, |app| app.name);
        self.menu_bar.render(frame, layout.menu_bar, Some(active_app));

        let running: Vec<&str> = self
            .wm
            .windows()
            .iter()
            .map(|window| window.app_id())
            .collect();
        self.dock.render(frame, layout.dock, &running);
        self.menu_bar.render_dropdown(frame, layout.viewport);

        if self.debug_log_visible
            && let Some(log) = self.debug_log.as_mut()
        {
            let height = (layout.viewport.height / 2).max(3).min(layout.viewport.height);
            let area = Rect {
                y: layout.viewport.y + layout.viewport.height - height,
                height,
                ..layout.viewport
            };
            log.render(frame, area, &ComponentContext::new(true).with_overlay(true));
        }
    }

    fn render_windows(&mut self, frame: &mut UiFrame<'_>, viewport: Rect) {
        let local = self.local_viewport();
        let focused = self.wm.focused();
        let mut target = UiFrame::from_parts(viewport, frame.buffer_mut());
        for id in self.wm.draw_order() {
            let (Some(window), Some(rect)) = (self.wm.window(id), self.wm.effective_rect(id, local))
            else {
                continue;
            };
            if rect.visible_in(local).width == 0 {
                continue;
            }
            let area = Rect::new(0, 0, rect.width, rect.height);
            let mut buffer = Buffer::empty(area);
            {
                let mut win_frame = UiFrame::from_parts(area, &mut buffer);
                let is_focused = focused == Some(id);
                self.decorator.render_window(
                    &mut win_frame,
                    area,
                    window.title(),
                    is_focused,
                    window.is_maximized(),
                );
                let content = self.decorator.content_rect(area);
                match self.bodies.get_mut(&id) {
                    Some(Ok(body)) => {
                        body.render(&mut win_frame, content, &ComponentContext::new(is_focused))
                    }
                    _ => render_fallback(&mut win_frame, content),
                }
            }
            target.blit_from_signed(
                &buffer,
                FloatRect {
                    x: rect.x + viewport.x as i32,
                    y: rect.y + viewport.y as i32,
                    ..rect
                },
            );
        }
    }
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new(AppRegistry::builtin(), &DesktopConfig::default())
    }
}

fn render_wallpaper(frame: &mut UiFrame<'_>, area: Rect) {
    let base = Style::default().bg(theme::desktop_bg());
    frame.fill(area, base);
    let pattern = base.fg(theme::desktop_pattern_fg());
    for y in area.y..area.y.saturating_add(area.height) {
        let offset = (y - area.y) % 2 * 3;
        let mut x = area.x + offset;
        while x < area.x.saturating_add(area.width) {
            frame.set_string(x, y, "·", pattern);
            x = x.saturating_add(6);
        }
    }
}

/// Neutral body drawn when an application failed to mount.
fn render_fallback(frame: &mut UiFrame<'_>, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let style = Style::default()
        .fg(theme::muted_fg())
        .bg(theme::window_bg());
    frame.fill(area, style);
    let width = FALLBACK_MESSAGE.chars().count() as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height / 2;
    frame.set_string(x, y, FALLBACK_MESSAGE, style.add_modifier(Modifier::ITALIC));
}
