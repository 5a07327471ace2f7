//! PaginationBar Widget
//!
//! One line of page controls: `‹ 1 … 11 12 13 14 15 … 25 ›`. The current
//! page is highlighted; arrows dim when there is nowhere to go. Renders
//! nothing for an empty result set.

use browser_core::{PageItem, PageView};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::theme::{DIM_GRAY, FADED_INK, LEATHER};

/// Page controls for a [`PageView`]
pub struct PaginationBar<'a> {
    view: &'a PageView,
}

impl<'a> PaginationBar<'a> {
    /// Bar over `view`
    pub fn new(view: &'a PageView) -> Self {
        Self { view }
    }

    /// The styled line, or `None` when there are no pages
    pub fn line(&self) -> Option<Line<'static>> {
        if !self.view.has_pages() {
            return None;
        }

        let arrow = |label: &'static str, enabled: bool| {
            let color = if enabled { LEATHER } else { DIM_GRAY };
            Span::styled(label, Style::default().fg(color))
        };

        let mut spans = vec![arrow("‹", self.view.prev().is_some())];
        for item in &self.view.items {
            spans.push(Span::raw(" "));
            spans.push(match item {
                PageItem::Page(n) if *n == self.view.current => Span::styled(
                    n.to_string(),
                    Style::default()
                        .fg(LEATHER)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED),
                ),
                PageItem::Page(n) => Span::styled(n.to_string(), Style::default().fg(FADED_INK)),
                PageItem::Ellipsis => Span::styled(item.to_string(), Style::default().fg(DIM_GRAY)),
            });
        }
        spans.push(Span::raw(" "));
        spans.push(arrow("›", self.view.next().is_some()));

        Some(Line::from(spans))
    }
}

impl Widget for PaginationBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if let Some(line) = self.line() {
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .render(area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(view: &PageView) -> Option<String> {
        PaginationBar::new(view).line().map(|line| line.to_string())
    }

    #[test]
    fn test_hidden_without_results() {
        assert_eq!(text(&PageView::new(0, 1)), None);
    }

    #[test]
    fn test_short_listing() {
        assert_eq!(text(&PageView::new(45, 2)).as_deref(), Some("‹ 1 2 3 ›"));
    }

    #[test]
    fn test_compressed_listing() {
        assert_eq!(
            text(&PageView::new(500, 13)).as_deref(),
            Some("‹ 1 … 11 12 13 14 15 … 25 ›")
        );
    }

    #[test]
    fn test_current_page_is_highlighted() {
        let view = PageView::new(100, 2);
        let line = PaginationBar::new(&view).line().unwrap();
        let current = line
            .spans
            .iter()
            .find(|span| span.content == "2")
            .unwrap();
        assert!(current.style.add_modifier.contains(Modifier::REVERSED));
    }
}
