use ratatui::style::Color;

// Centralized theme colors. Most helpers prefer a truecolor value and fall
// back to the closest named ANSI color on terminals without 24-bit support.

pub const TRAFFIC_CLOSE_RGB: (u8, u8, u8) = (255, 95, 87);
pub const TRAFFIC_MINIMIZE_RGB: (u8, u8, u8) = (254, 188, 46);
pub const TRAFFIC_MAXIMIZE_RGB: (u8, u8, u8) = (40, 200, 64);

fn truecolor_supported() -> bool {
    std::env::var("COLORTERM")
        .map(|var| {
            let var = var.to_lowercase();
            var.contains("truecolor") || var.contains("24bit")
        })
        .unwrap_or(false)
}

pub fn rgb_or(rgb: (u8, u8, u8), fallback: Color) -> Color {
    if truecolor_supported() {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    } else {
        fallback
    }
}

// Desktop
pub fn desktop_bg() -> Color {
    rgb_or((36, 52, 86), Color::Blue)
}
pub fn desktop_pattern_fg() -> Color {
    rgb_or((58, 78, 120), Color::LightBlue)
}

// Menu bar
pub fn menubar_bg() -> Color {
    Color::Gray
}
pub fn menubar_fg() -> Color {
    Color::Black
}
pub fn menubar_active_bg() -> Color {
    Color::White
}

// App menu dropdown
pub fn menu_bg() -> Color {
    Color::White
}
pub fn menu_fg() -> Color {
    Color::Black
}
pub fn menu_selected_bg() -> Color {
    Color::Blue
}
pub fn menu_selected_fg() -> Color {
    Color::White
}
pub fn menu_separator() -> Color {
    Color::DarkGray
}

// Dock
pub fn dock_bg() -> Color {
    Color::DarkGray
}
pub fn dock_fg() -> Color {
    Color::White
}
pub fn dock_running_fg() -> Color {
    Color::LightCyan
}

// Window chrome
pub fn header_focused_bg() -> Color {
    Color::Gray
}
pub fn header_unfocused_bg() -> Color {
    Color::DarkGray
}
pub fn header_fg() -> Color {
    Color::Black
}
pub fn window_border() -> Color {
    Color::Gray
}
pub fn window_bg() -> Color {
    Color::Black
}
pub fn window_fg() -> Color {
    Color::White
}
pub fn traffic_close() -> Color {
    rgb_or(TRAFFIC_CLOSE_RGB, Color::Red)
}
pub fn traffic_minimize() -> Color {
    rgb_or(TRAFFIC_MINIMIZE_RGB, Color::Yellow)
}
pub fn traffic_maximize() -> Color {
    rgb_or(TRAFFIC_MAXIMIZE_RGB, Color::Green)
}

// Application bodies
pub fn toolbar_bg() -> Color {
    Color::DarkGray
}
pub fn toolbar_fg() -> Color {
    Color::White
}
pub fn selection_bg() -> Color {
    Color::Blue
}
pub fn selection_fg() -> Color {
    Color::White
}
pub fn muted_fg() -> Color {
    Color::Gray
}
pub fn error_fg() -> Color {
    Color::LightRed
}

/// Battery glyph color for a charge level: red when critical, orange when
/// low, yellow when fair, green otherwise.
pub fn battery_level(level: u8) -> Color {
    match level {
        0..=15 => rgb_or((255, 0, 0), Color::Red),
        16..=30 => rgb_or((255, 153, 0), Color::LightRed),
        31..=60 => rgb_or((255, 255, 0), Color::Yellow),
        _ => rgb_or((0, 255, 0), Color::Green),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_reddish(color: Color) -> bool {
        matches!(color, Color::Red | Color::Rgb(255, 0, 0))
    }

    #[test]
    fn battery_thresholds_pick_distinct_colors() {
        assert!(is_reddish(battery_level(15)));
        assert!(!is_reddish(battery_level(16)));
        assert_ne!(battery_level(30), battery_level(31));
        assert_ne!(battery_level(60), battery_level(61));
        assert_eq!(battery_level(61), battery_level(100));
    }
}
