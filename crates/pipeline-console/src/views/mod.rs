use crate::state::AppState;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

pub mod console_view;
pub mod status_bar;

/// Rows reserved for the status bar at the bottom of the screen
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Render the whole screen: step list above, status bar below
pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let [list_area, status_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(STATUS_BAR_HEIGHT),
    ])
    .areas(area);

    console_view::render(&state.console, list_area, f.buffer_mut());
    status_bar::render(state, status_area, f.buffer_mut());
}
