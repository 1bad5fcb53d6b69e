use ratatui::style::Color;

use crate::constants::CONTENT_BACKGROUND_RGB;

// Centralized theme colors for the hover menu. Kept as small helpers so the
// palette lives in one place.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);

/// `Color::Rgb` on truecolor terminals, otherwise the closest xterm-256
/// grey or cube entry.
pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    let truecolor = std::env::var("COLORTERM")
        .map(|v| {
            let v = v.to_lowercase();
            v.contains("truecolor") || v.contains("24bit")
        })
        .unwrap_or(false);
    if truecolor {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    } else {
        Color::Indexed(xterm_index(rgb))
    }
}

fn xterm_index((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        // 24-step grey ramp at 232..=255
        let step = (u16::from(r) * 23 + 127) / 255;
        return 232 + step as u8;
    }
    let six = |c: u8| ((u16::from(c) * 5 + 127) / 255) as u8;
    16 + 36 * six(r) + 6 * six(g) + six(b)
}

pub fn accent() -> Color {
    rgb_to_color(ACCENT_RGB)
}

// Collapsed tab
pub fn tab_bg() -> Color {
    accent()
}
pub fn tab_fg() -> Color {
    Color::Black
}
pub fn tab_dragging_bg() -> Color {
    Color::Yellow
}

// Expanded menu
pub fn content_bg() -> Color {
    rgb_to_color(CONTENT_BACKGROUND_RGB)
}
pub fn content_fg() -> Color {
    Color::White
}
pub fn tab_strip_bg() -> Color {
    Color::DarkGray
}
pub fn tab_strip_fg() -> Color {
    Color::Gray
}
pub fn tab_selected_bg() -> Color {
    accent()
}
pub fn tab_selected_fg() -> Color {
    Color::Black
}

// Exit target shown while dragging
pub fn exit_zone_bg() -> Color {
    Color::Red
}
pub fn exit_zone_armed_bg() -> Color {
    Color::LightRed
}
pub fn exit_zone_fg() -> Color {
    Color::White
}

// Background application pane
pub fn pane_fg() -> Color {
    Color::Gray
}
pub fn pane_highlight() -> Color {
    Color::Green
}
