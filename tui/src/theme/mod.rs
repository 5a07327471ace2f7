//! Theme and Colors
//!
//! A warm paper-and-ink palette: ink text on the terminal background, a
//! leather accent for focus, and muted tones for metadata.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Palette
// ============================================================================

/// Accent - worn leather brown (focus, headings)
pub const LEATHER: Color = Color::Rgb(205, 133, 63);

/// Highlight background for the cursor row
pub const SPINE: Color = Color::Rgb(92, 64, 51);

/// Titles
pub const INK: Color = Color::Rgb(235, 228, 214);

/// Authors and secondary text
pub const FADED_INK: Color = Color::Rgb(170, 160, 145);

/// Links
pub const LINK_BLUE: Color = Color::Rgb(110, 170, 255);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Loading indicator
pub const LOADING_YELLOW: Color = Color::Rgb(255, 223, 128);

// ============================================================================
// Styles
// ============================================================================

/// Border style for a pane, brighter when it has focus
pub fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(LEATHER)
    } else {
        Style::default().fg(DIM_GRAY)
    }
}

/// Heading text
pub fn heading() -> Style {
    Style::default().fg(LEATHER).add_modifier(Modifier::BOLD)
}

/// Cursor row in the result list
pub fn cursor_row() -> Style {
    Style::default()
        .fg(INK)
        .bg(SPINE)
        .add_modifier(Modifier::BOLD)
}
