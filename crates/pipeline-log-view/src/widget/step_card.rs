//! Step card widget: header, truncation warning and the log rows.

use crate::card::{RenderPhase, StepCard, StepCardOptions};
use crate::model::{needs_warning, pretty_size, LogBuffer, StepInfo};
use crate::traits::ThemeProvider;
use crate::virtualized::VirtualizedLines;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Widget};

const SHOW_MORE_HINT: &str = "[m] Show more logs";
const LOADING_TEXT: &str = "Loading console log…";

/// Rows the log body takes up.
///
/// One row per loaded line, capped at `max_body_rows`; long lines are cut
/// at the card edge and reached by panning. A card without loaded lines has
/// an empty body, unless the first fetch is still running, in which case
/// one row is reserved for the placeholder.
pub fn body_rows(card: &StepCard, buffer: Option<&LogBuffer>, options: &StepCardOptions) -> u16 {
    if card.phase(buffer.is_some()) == RenderPhase::Placeholder {
        return 1;
    }
    match buffer {
        Some(buffer) if !buffer.is_empty() => {
            buffer.len().min(usize::from(options.max_body_rows)).max(1) as u16
        }
        _ => 0,
    }
}

/// Columns left for log text in a card of the given outer width, after
/// borders and the line number gutter.
pub fn content_width(buffer: &LogBuffer, width: u16, options: &StepCardOptions) -> u16 {
    let gutter = if options.show_line_numbers {
        VirtualizedLines::new(&buffer.lines).number_width() as u16 + 1
    } else {
        0
    };
    width.saturating_sub(2).saturating_sub(gutter)
}

/// Renders one step card.
///
/// # Example
///
/// ```ignore
/// let widget = StepCardWidget::new(&step, &card, buffer, &theme)
///     .options(options)
///     .focused(true);
/// let height = widget.height();
/// frame.render_widget(widget, Rect { height, ..area });
/// ```
pub struct StepCardWidget<'a, T: ThemeProvider> {
    step: &'a StepInfo,
    card: &'a StepCard,
    buffer: Option<&'a LogBuffer>,
    theme: &'a T,
    options: StepCardOptions,
    focused: bool,
}

impl<'a, T: ThemeProvider> StepCardWidget<'a, T> {
    pub fn new(
        step: &'a StepInfo,
        card: &'a StepCard,
        buffer: Option<&'a LogBuffer>,
        theme: &'a T,
    ) -> Self {
        Self {
            step,
            card,
            buffer,
            theme,
            options: StepCardOptions::default(),
            focused: false,
        }
    }

    pub fn options(mut self, options: StepCardOptions) -> Self {
        self.options = options;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn shows_warning(&self) -> bool {
        self.buffer.map(needs_warning).unwrap_or(false)
    }

    /// Total height including borders.
    pub fn height(&self) -> u16 {
        let mut height = 3; // borders + header
        if self.card.is_expanded() {
            if self.shows_warning() {
                height += 1;
            }
            if self.card.error.is_some() {
                height += 1;
            }
            height += body_rows(self.card, self.buffer, &self.options);
        }
        height
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let header = self.step.header();
        let state_style = Style::default().fg(self.theme.state_color(self.step.state));

        let mut spans = vec![
            Span::styled(self.card.indicator().glyph(), self.theme.muted()),
            Span::raw(" "),
            Span::styled(self.step.state.icon(), state_style),
            Span::raw(" "),
            Span::styled(header.title, self.theme.header_title()),
        ];
        if !header.label.is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(header.label, self.theme.header_label()));
        }
        if self.card.loading {
            spans.push(Span::styled(" ⋯", self.theme.muted()));
        }

        // The duration keeps its place on the right, one column apart from
        // the title, which is clipped instead
        let duration = Span::styled(self.step.duration_label(), self.theme.header_label());
        let duration_width = duration.width() as u16;
        let title_width = if duration_width > 0 && duration_width < area.width {
            let x = area.right() - duration_width;
            buf.set_span(x, area.y, &duration, duration_width);
            (area.width - duration_width).saturating_sub(1)
        } else {
            area.width
        };
        buf.set_line(area.x, area.y, &Line::from(spans), title_width);
    }

    fn render_warning(&self, buffer: &LogBuffer, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(
                format!("Missing {} of logs.", pretty_size(buffer.missing_bytes())),
                self.theme.warning(),
            ),
            Span::raw("  "),
            Span::styled(SHOW_MORE_HINT, self.theme.action_hint(!self.card.loading)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }

    fn render_error(&self, message: &str, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(format!("⚠ {}", message), self.theme.error()),
            Span::styled("  (x to dismiss)", self.theme.muted()),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }

    fn render_rows(&self, buffer: &LogBuffer, area: Rect, buf: &mut Buffer) {
        let lines = VirtualizedLines::new(&buffer.lines);
        let mut viewport = self.card.viewport;
        viewport.set_height(area.height as usize, lines.len());
        let visible = viewport.visible_range(lines.len());

        let number_width = lines.number_width();
        for row in lines.rows(&viewport) {
            if !visible.contains(&row.index) {
                continue;
            }
            let y = area.y + (row.index - visible.start) as u16;
            let mut x = area.x;
            let mut remaining = area.width;

            if self.options.show_line_numbers {
                let number = format!("{:>width$} ", row.number, width = number_width);
                let (next_x, _) =
                    buf.set_stringn(x, y, &number, remaining as usize, self.theme.line_number());
                remaining = remaining.saturating_sub(next_x - x);
                x = next_x;
            }
            if remaining > 0 {
                buf.set_stringn(
                    x,
                    y,
                    row.from_column(viewport.column_offset),
                    remaining as usize,
                    self.theme.line_content(),
                );
            }
        }
    }
}

impl<T: ThemeProvider> Widget for StepCardWidget<'_, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.card_border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        self.render_header(Rect { height: 1, ..inner }, buf);
        if !self.card.is_expanded() {
            return;
        }

        let mut y = inner.y + 1;
        let bottom = inner.bottom();

        if let Some(buffer) = self.buffer.filter(|b| needs_warning(b)) {
            if y < bottom {
                self.render_warning(buffer, Rect::new(inner.x, y, inner.width, 1), buf);
                y += 1;
            }
        }

        if let Some(message) = &self.card.error {
            if y < bottom {
                self.render_error(message, Rect::new(inner.x, y, inner.width, 1), buf);
                y += 1;
            }
        }

        if y >= bottom {
            return;
        }
        let body = Rect::new(inner.x, y, inner.width, bottom - y);

        match (self.card.phase(self.buffer.is_some()), self.buffer) {
            (RenderPhase::Placeholder, _) => {
                buf.set_stringn(
                    body.x,
                    body.y,
                    LOADING_TEXT,
                    body.width as usize,
                    self.theme.muted(),
                );
            }
            (RenderPhase::Ready, Some(buffer)) => self.render_rows(buffer, body, buf),
            (RenderPhase::Ready, None) => {}
        }
    }
}
