use term_desk::apps::AppRegistry;
use term_desk::window::{DragController, WindowManager};

#[test]
fn repeated_open_keeps_single_focused_window() {
    let mut wm = WindowManager::default();
    let first = wm.open("finder").unwrap();
    for _ in 0..3 {
        let id = wm.open("finder").unwrap();
        assert_eq!(id, first);
        assert_eq!(wm.windows().len(), 1);
        assert!(!wm.window(id).unwrap().is_minimized());
        assert_eq!(wm.focused(), Some(id));
    }
}

#[test]
fn close_is_idempotent() {
    let mut wm = WindowManager::default();
    let keep = wm.open("finder").unwrap();
    let gone = wm.open("notes").unwrap();
    assert!(wm.close(gone));
    let snapshot = wm.windows().to_vec();
    assert!(!wm.close(gone));
    assert_eq!(wm.windows(), snapshot.as_slice());
    assert!(wm.window(keep).is_some());
}

#[test]
fn minimized_window_is_restored_by_open_with_same_id() {
    let mut wm = WindowManager::default();
    let id = wm.open("safari").unwrap();
    wm.minimize(id);
    assert!(!wm.is_visible(id));
    assert_eq!(wm.open("safari"), Some(id));
    assert!(wm.is_visible(id));
}

#[test]
fn maximize_twice_restores_geometry() {
    let mut wm = WindowManager::default();
    let id = wm.open("notes").unwrap();
    wm.move_window(id, 17, 9);
    let before = wm.window(id).unwrap().rect();
    wm.toggle_maximize(id);
    assert!(wm.window(id).unwrap().is_maximized());
    wm.toggle_maximize(id);
    let after = wm.window(id).unwrap();
    assert!(!after.is_maximized());
    assert_eq!(after.rect(), before);
}

#[test]
fn drag_follows_pointer_with_captured_offset() {
    let mut wm = WindowManager::default();
    let id = wm.open("notes").unwrap();
    wm.move_window(id, 100, 50);
    let mut drag = DragController::new();
    assert!(drag.pointer_down(&wm, id, 120, 60));
    assert!(drag.pointer_move(&mut wm, 200, 130));
    assert!(drag.pointer_up());
    assert_eq!(wm.window(id).unwrap().position(), (180, 120));
}

#[test]
fn opening_notes_twice_yields_one_window_titled_notes() {
    let mut wm = WindowManager::default();
    wm.open("notes");
    wm.open("notes");
    let notes: Vec<_> = wm
        .windows()
        .iter()
        .filter(|window| window.app_id() == "notes")
        .collect();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title(), "Notes");
}

#[test]
fn focus_cleared_only_when_focused_window_closes() {
    let mut wm = WindowManager::default();
    let a = wm.open("finder").unwrap();
    let b = wm.open("notes").unwrap();
    assert_eq!(wm.focused(), Some(b));
    wm.close(a);
    assert_eq!(wm.focused(), Some(b));
    wm.close(b);
    assert_eq!(wm.focused(), None);
}

#[test]
fn unknown_app_and_ids_are_no_ops() {
    let mut wm = WindowManager::new(AppRegistry::builtin());
    assert_eq!(wm.open("messages"), None);
    assert!(wm.windows().is_empty());

    let id = wm.open("finder").unwrap();
    wm.close(id);
    wm.minimize(id);
    wm.move_window(id, 1, 1);
    assert!(!wm.toggle_maximize(id));
    wm.focus(id);
    assert!(wm.windows().is_empty());
    assert_eq!(wm.focused(), None);
}

#[test]
fn title_is_not_resynced_after_creation() {
    let mut wm = WindowManager::default();
    let id = wm.open("safari").unwrap();
    let title = wm.window(id).unwrap().title().to_string();
    wm.minimize(id);
    wm.open("safari");
    assert_eq!(wm.window(id).unwrap().title(), title);
}
