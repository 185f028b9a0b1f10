use crate::state::AppState;
use crate::view_models::console_view_model::ConsoleViewModel;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Span,
};

/// Render the one-line status bar: position or error on the left, key hints on the right
pub fn render(state: &AppState, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }
    let view_model = ConsoleViewModel::new(&state.console, state.tick);

    let status_style = if state.console.load_error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Gray)
    };
    buf.set_stringn(area.x, area.y, view_model.status(), area.width as usize, status_style);

    let hints = Span::styled(view_model.key_hints(), Style::default().fg(Color::DarkGray));
    let hints_width = hints.width() as u16;
    if hints_width < area.width {
        buf.set_span(area.right() - hints_width, area.y, &hints, hints_width);
    }
}
