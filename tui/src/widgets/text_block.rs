//! TextBlock Widget
//!
//! A borderless, scrollable text region used for book descriptions and
//! explanations.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

/// State for a scrollable text block
#[derive(Debug, Default)]
pub struct TextBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines after wrapping
    pub total_lines: usize,
}

impl TextBlockState {
    /// Scroll by delta (positive = down)
    pub fn scroll(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
    }

    /// Back to the first line
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }
}

/// Wrap `content` to `width` columns, keeping blank lines
pub fn wrap_lines(content: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    content
        .lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                wrap(line, width)
                    .into_iter()
                    .map(|cow| cow.to_string())
                    .collect()
            }
        })
        .collect()
}

/// A borderless, scrollable text block
pub struct TextBlock<'a> {
    content: &'a str,
    style: Style,
}

impl<'a> TextBlock<'a> {
    /// Block over `content` with the default style
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            style: Style::default(),
        }
    }

    /// Style applied to every line
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let wrapped = wrap_lines(self.content, area.width as usize);
        state.total_lines = wrapped.len();

        // Clamp scroll
        let max_scroll = state.total_lines.saturating_sub(area.height as usize);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        for (y, line) in (area.y..area.bottom()).zip(wrapped.iter().skip(state.scroll_offset)) {
            buf.set_string(area.x, y, line, self.style);
        }
    }
}
