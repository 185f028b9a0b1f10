use crate::actions::Action;
use crate::reducers::console_reducer;
use crate::state::AppState;

/// Reducer - pure function that produces new state from current state + action
///
/// This is the root reducer. It handles truly global actions and delegates
/// everything step related to the console reducer.
pub fn reduce(mut state: AppState, action: &Action) -> AppState {
    match action {
        Action::GlobalQuit => {
            state.running = false;
            return state;
        }
        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            return state;
        }
        _ => {}
    }

    state.console = console_reducer::reduce(state.console, action);
    state
}
