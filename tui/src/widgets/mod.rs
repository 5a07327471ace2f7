//! Widgets
//!
//! - [`TextBlock`]: borderless wrapped text with scroll state
//! - [`PaginationBar`]: page controls for the result list

mod pagination;
mod text_block;

pub use pagination::PaginationBar;
pub use text_block::{wrap_lines, TextBlock, TextBlockState};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `text` to at most `width` display columns, marking the cut with `…`
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
