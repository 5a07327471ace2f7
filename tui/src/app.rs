//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize, call completions, frame tick)
//! - Browser for all interaction state
//! - StatusLine derived from browser notices
//!
//! The App keeps only presentation state of its own (focus, list cursor,
//! scroll offsets). Everything it renders about books, pages, the overlay,
//! and explanations is read from the [`Browser`] on every frame.

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, HighlightSpacing, List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use browser_core::{
    BookBackend, Browser, BrowserConfig, BrowserNotice, ExplainTarget, ExplanationSlot, UserAction,
};

use crate::status::{StatusKind, StatusLine};
use crate::theme;
use crate::widgets::{truncate, PaginationBar, TextBlock, TextBlockState};

/// Frame tick when nothing else happens
const TICK: Duration = Duration::from_millis(100);

/// Upper bound on the startup health check
const HEALTH_CHECK_BUDGET: Duration = Duration::from_secs(2);

/// Notice channel capacity
const NOTICE_BUFFER: usize = 100;

/// Heading of the explanation panel
pub const EXPLANATION_HEADING: &str = "Why you'll like this book:";

/// Which pane receives keystrokes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    /// Editing the query
    Query,
    /// Moving through results
    List,
}

/// Main application state
pub struct App<B: BookBackend> {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Interaction state and outbound calls
    browser: Browser<B>,
    /// Notices from the browser
    notices: mpsc::Receiver<BrowserNotice>,
    /// Query submitted once on startup
    initial_query: Option<String>,

    // === Presentation State ===
    /// Status line derived from notices
    status: StatusLine,
    /// Pane receiving keys
    focus: Focus,
    /// Highlighted row on the current page
    cursor: usize,
    /// Scroll state of the description in the overlay
    detail_scroll: TextBlockState,
    /// Scroll state of the explanation panel
    explanation_scroll: TextBlockState,
    /// Last frame time (for status timers)
    last_frame: Instant,
}

impl<B: BookBackend + 'static> App<B> {
    /// Create a new App over `backend`
    pub fn new(backend: B, config: BrowserConfig) -> Self {
        let (tx, notices) = mpsc::channel(NOTICE_BUFFER);

        Self {
            running: true,
            browser: Browser::new(backend, config, tx),
            notices,
            initial_query: None,
            status: StatusLine::new(),
            focus: Focus::Query,
            cursor: 0,
            detail_scroll: TextBlockState::default(),
            explanation_scroll: TextBlockState::default(),
            last_frame: Instant::now(),
        }
    }

    /// Submit `query` as soon as the app starts
    #[must_use]
    pub fn with_initial_query(mut self, query: Option<String>) -> Self {
        self.initial_query = query.filter(|q| !q.trim().is_empty());
        self
    }

    /// Interaction state
    pub fn browser(&self) -> &Browser<B> {
        &self.browser
    }

    /// Pane receiving keys
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Highlighted row on the current page
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the event loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Main event loop
    pub async fn run<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        // Render initial frame immediately so user sees UI
        terminal.draw(|frame| self.draw(frame))?;

        if tokio::time::timeout(HEALTH_CHECK_BUDGET, self.browser.start())
            .await
            .is_err()
        {
            tracing::warn!("Health check did not finish in time");
        }

        if let Some(query) = self.initial_query.take() {
            self.browser.handle_action(UserAction::SetQuery(query)).await;
            self.submit_query().await;
        }

        let mut event_stream = EventStream::new();

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    // Only handle Press events (not Release or Repeat)
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key).await;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                    None => self.running = false,
                },

                Some(completion) = self.browser.next_completion() => {
                    self.browser.apply_completion(completion).await;
                }

                () = tokio::time::sleep(TICK) => {}
            }

            self.process_notices();
            self.update();
            terminal.draw(|frame| self.draw(frame))?;
        }

        Ok(())
    }

    /// Apply every pending notice from the browser
    pub fn process_notices(&mut self) {
        while let Ok(notice) = self.notices.try_recv() {
            match &notice {
                BrowserNotice::ScrollToTop | BrowserNotice::SearchCompleted { .. } => {
                    self.cursor = 0;
                }
                _ => {}
            }
            self.status.apply_notice(&notice);
        }
    }

    /// Advance timers and keep the cursor on an existing row
    fn update(&mut self) {
        let now = Instant::now();
        self.status.update(now - self.last_frame);
        self.last_frame = now;

        let rows = self.browser.search().visible().len();
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        match key.code {
            KeyCode::Esc => self.back_out().await,
            KeyCode::PageUp => self.explanation_scroll.scroll(-3),
            KeyCode::PageDown => self.explanation_scroll.scroll(3),
            _ if self.browser.overlay().is_open() => self.handle_overlay_key(key).await,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Query => Focus::List,
                    Focus::List => Focus::Query,
                };
            }
            _ => match self.focus {
                Focus::Query => self.handle_query_key(key).await,
                Focus::List => self.handle_list_key(key).await,
            },
        }
    }

    /// Close the innermost open thing, or quit
    async fn back_out(&mut self) {
        if self.browser.explanation().is_open() {
            self.browser.handle_action(UserAction::DismissExplanation).await;
        } else if self.browser.overlay().is_open() {
            self.browser.handle_action(UserAction::CloseDetail).await;
        } else {
            self.running = false;
        }
    }

    async fn handle_query_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_query().await,
            KeyCode::Down => self.focus = Focus::List,
            KeyCode::Char(c) => {
                let mut query = self.browser.search().query().to_string();
                query.push(c);
                self.browser.handle_action(UserAction::SetQuery(query)).await;
            }
            KeyCode::Backspace => {
                let mut query = self.browser.search().query().to_string();
                query.pop();
                self.browser.handle_action(UserAction::SetQuery(query)).await;
            }
            _ => {}
        }
    }

    async fn submit_query(&mut self) {
        let generation = self.browser.search().generation();
        self.browser.handle_action(UserAction::SubmitQuery).await;
        if self.browser.search().generation() != generation {
            self.focus = Focus::List;
        }
    }

    async fn handle_list_key(&mut self, key: KeyEvent) {
        let rows = self.browser.search().visible().len();

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < rows {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::Left | KeyCode::Char('[') => {
                self.browser.handle_action(UserAction::PrevPage).await;
            }
            KeyCode::Right | KeyCode::Char(']') => {
                self.browser.handle_action(UserAction::NextPage).await;
            }
            KeyCode::Enter => {
                self.detail_scroll.reset();
                self.browser
                    .handle_action(UserAction::OpenDetail { row: self.cursor })
                    .await;
            }
            KeyCode::Char('e') => {
                self.explanation_scroll.reset();
                self.browser
                    .handle_action(UserAction::RequestExplanation(ExplainTarget::Row(
                        self.cursor,
                    )))
                    .await;
            }
            KeyCode::Char('/') => self.focus = Focus::Query,
            _ => {}
        }
    }

    async fn handle_overlay_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('E' | 'e') => {
                self.explanation_scroll.reset();
                self.browser
                    .handle_action(UserAction::RequestExplanation(ExplainTarget::Selected))
                    .await;
            }
            KeyCode::Up | KeyCode::Char('k') => self.detail_scroll.scroll(-1),
            KeyCode::Down | KeyCode::Char('j') => self.detail_scroll.scroll(1),
            _ => {}
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render one frame
    pub fn draw(&mut self, frame: &mut Frame) {
        let [query_area, list_area, pages_area, status_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.draw_query(frame, query_area);
        self.draw_results(frame, list_area);
        frame.render_widget(PaginationBar::new(&self.browser.page_view()), pages_area);
        self.draw_status(frame, status_area);

        if self.browser.overlay().is_open() {
            self.draw_overlay(frame);
        }
        if self.browser.explanation().is_open() {
            self.draw_explanation(frame);
        }
    }

    fn draw_query(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Query && !self.browser.overlay().is_open();
        let mut block = Block::bordered()
            .title(" Search ")
            .border_style(theme::border(focused));
        if self.browser.search().is_loading() {
            block = block.title_top(
                Line::styled(" Searching… ", Style::default().fg(theme::LOADING_YELLOW))
                    .right_aligned(),
            );
        }

        let mut spans = vec![
            Span::styled("> ", theme::heading()),
            Span::styled(
                self.browser.search().query().to_string(),
                Style::default().fg(theme::INK),
            ),
        ];
        if focused {
            spans.push(Span::styled("_", Style::default().fg(theme::LEATHER)));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn draw_results(&self, frame: &mut Frame, area: Rect) {
        let search = self.browser.search();
        let view = search.page_view();
        let focused = self.focus == Focus::List && !self.browser.overlay().is_open();

        let title = if view.has_pages() {
            format!(
                " Results {}-{} of {} ",
                view.range.start + 1,
                view.range.end,
                search.results().len()
            )
        } else {
            " Results ".to_string()
        };
        let block = Block::bordered()
            .title(title)
            .border_style(theme::border(focused));

        let visible = search.visible();
        if visible.is_empty() {
            let hint = if search.is_loading() {
                "Searching…"
            } else if search.generation() == 0 {
                "Type what you feel like reading and press Enter."
            } else {
                "No books found."
            };
            frame.render_widget(
                Paragraph::new(Span::styled(hint, Style::default().fg(theme::DIM_GRAY)))
                    .block(block),
                area,
            );
            return;
        }

        // Room left after borders and the highlight symbol
        let width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = visible
            .iter()
            .map(|book| {
                let title = truncate(&book.title, width);
                let room = width.saturating_sub(title.chars().count() + 4);
                let mut spans = vec![Span::styled(
                    title,
                    Style::default().fg(theme::INK).add_modifier(Modifier::BOLD),
                )];
                if room > 0 && !book.authors.is_empty() {
                    spans.push(Span::styled(
                        format!(" by {}", truncate(&book.authors, room)),
                        Style::default().fg(theme::FADED_INK),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme::cursor_row())
            .highlight_symbol("▌ ")
            .highlight_spacing(HighlightSpacing::Always);
        let mut state = ListState::default().with_selected(Some(self.cursor));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let line = match self.status.current() {
            Some(message) => {
                let color = match message.kind {
                    StatusKind::Info => theme::SUCCESS_GREEN,
                    StatusKind::Error => theme::ERROR_RED,
                };
                Line::styled(format!(" {}", message.text), Style::default().fg(color))
            }
            None => Line::styled(self.key_hints(), Style::default().fg(theme::DIM_GRAY)),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn key_hints(&self) -> &'static str {
        if self.browser.overlay().is_open() {
            " E explain | ↑/↓ scroll | Esc close"
        } else {
            match self.focus {
                Focus::Query => " Enter search | Tab results | Esc quit",
                Focus::List => " ↑/↓ move | ←/→ page | Enter details | e explain | Tab query | Esc quit",
            }
        }
    }

    fn draw_overlay(&mut self, frame: &mut Frame) {
        let Some(details) = self.browser.overlay().details() else {
            return;
        };

        let area = centered_rect(80, 80, frame.area());
        frame.render_widget(Clear, area);
        let block = Block::bordered()
            .title(Line::styled(format!(" {} ", details.title), theme::heading()))
            .border_style(theme::border(true));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label = |name: &'static str, value: String| {
            Line::from(vec![
                Span::styled(name, Style::default().fg(theme::FADED_INK)),
                Span::styled(value, Style::default().fg(theme::INK)),
            ])
        };
        let mut meta = vec![
            label("Author: ", details.authors),
            label("Genre: ", details.genre),
            label("Rating: ", details.rating),
            label("Published: ", details.published_year),
        ];
        if let Some(cover) = details.cover_url {
            meta.push(label("Cover: ", cover));
        }
        let meta_height = u16::try_from(meta.len()).unwrap_or(u16::MAX);

        let [meta_area, _, description_area, link_area] = Layout::vertical([
            Constraint::Length(meta_height),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(Paragraph::new(meta), meta_area);
        frame.render_stateful_widget(
            TextBlock::new(&details.description).style(Style::default().fg(theme::INK)),
            description_area,
            &mut self.detail_scroll,
        );

        if let Some(link) = details.purchase_link {
            let line = Line::from(vec![
                Span::styled(
                    link.label,
                    Style::default()
                        .fg(theme::LINK_BLUE)
                        .add_modifier(Modifier::UNDERLINED),
                ),
                Span::styled(format!(" {}", link.url), Style::default().fg(theme::DIM_GRAY)),
            ]);
            frame.render_widget(Paragraph::new(line), link_area);
        }
    }

    fn draw_explanation(&mut self, frame: &mut Frame) {
        let explanation = self.browser.explanation();
        let Some(text) = explanation.slot().text() else {
            return;
        };
        let subject = explanation
            .subject()
            .map(|book| book.title.clone())
            .unwrap_or_default();

        let full = frame.area();
        let height = full.height.min(10);
        let [area] = Layout::horizontal([Constraint::Percentage(70)])
            .flex(Flex::Center)
            .areas(Rect::new(full.x, full.bottom() - height, full.width, height));

        frame.render_widget(Clear, area);
        let block = Block::bordered()
            .title(Line::styled(format!(" {EXPLANATION_HEADING} "), theme::heading()))
            .title_bottom(Line::styled(
                format!(" {} ", truncate(&subject, area.width.saturating_sub(4) as usize)),
                Style::default().fg(theme::FADED_INK),
            ))
            .border_style(theme::border(true));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let style = if *explanation.slot() == ExplanationSlot::Pending {
            Style::default().fg(theme::LOADING_YELLOW)
        } else {
            Style::default().fg(theme::INK)
        };
        let text = text.to_string();
        frame.render_stateful_widget(
            TextBlock::new(&text).style(style),
            inner,
            &mut self.explanation_scroll,
        );
    }
}

/// A rectangle of `percent_x` by `percent_y` centered in `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(r);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    area
}
