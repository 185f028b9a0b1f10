//! KeyboardMiddleware - converts raw keyboard events to semantic actions
//!
//! Card-specific actions carry the id of the selected step, so later
//! middleware doesn't have to look it up again.

use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AppState;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct KeyboardMiddleware;

impl KeyboardMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for KeyboardMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for KeyboardMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        if let Action::GlobalKeyPressed(key) = action {
            if let Some(action) = translate_key(key, state) {
                dispatcher.dispatch(action);
            } else {
                log::trace!("Unhandled key: {:?}", key);
            }
            // Consume the raw key event (don't pass to reducer)
            return false;
        }

        // Pass all other actions through
        true
    }
}

/// Map a key event to a semantic action, given the current state
fn translate_key(key: &KeyEvent, state: &AppState) -> Option<Action> {
    let plain = key.modifiers == KeyModifiers::NONE || key.modifiers == KeyModifiers::SHIFT;
    let selected = state.console.selected_id().cloned();
    let expanded = selected
        .as_ref()
        .map(|id| state.console.is_expanded(id))
        .unwrap_or(false);

    match key.code {
        // Global quit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::GlobalQuit)
        }
        KeyCode::Char('q') if plain => Some(Action::GlobalQuit),
        KeyCode::Esc => Some(Action::GlobalQuit),

        // Step selection
        KeyCode::Char('j') if plain => Some(Action::NavigateNext),
        KeyCode::Down => Some(Action::NavigateNext),
        KeyCode::Char('k') if plain => Some(Action::NavigatePrevious),
        KeyCode::Up => Some(Action::NavigatePrevious),

        // Expand / collapse
        KeyCode::Enter | KeyCode::Char(' ') => selected.map(Action::StepToggle),

        // Log scrolling, only meaningful inside an expanded card
        KeyCode::Char('J') if expanded => Some(Action::LogScrollBy(1)),
        KeyCode::Char('K') if expanded => Some(Action::LogScrollBy(-1)),
        KeyCode::PageDown if expanded => Some(Action::LogScrollPage(1)),
        KeyCode::PageUp if expanded => Some(Action::LogScrollPage(-1)),
        KeyCode::Char('g') if expanded => Some(Action::LogScrollToTop),
        KeyCode::Char('G') if expanded => Some(Action::LogScrollToBottom),
        KeyCode::Char('h') | KeyCode::Left if expanded => Some(Action::LogPan(-1)),
        KeyCode::Char('l') | KeyCode::Right if expanded => Some(Action::LogPan(1)),

        // Pagination and errors
        KeyCode::Char('m') if expanded => selected.map(Action::LogShowMore),
        KeyCode::Char('x') => selected.map(Action::LogDismissError),

        _ => None,
    }
}
