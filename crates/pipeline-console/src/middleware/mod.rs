use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::state::AppState;

pub mod bootstrap_middleware;
pub mod keyboard_middleware;
pub mod log_fetch_middleware;
pub mod logging_middleware;

/// Middleware sees every action before the reducer does.
///
/// Side effects (spawning fetches, loading files, translating keys) live
/// here so reducers stay pure. Returning `false` consumes the action.
pub trait Middleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool;
}
