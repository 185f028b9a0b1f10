use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::reducers::app_reducer;
use crate::state::AppState;

/// Store - holds the state and runs actions through middleware and reducer
pub struct Store {
    state: AppState,
    middleware: Vec<Box<dyn Middleware>>,
    dispatcher: Dispatcher,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            middleware: Vec::new(),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Middleware runs in insertion order
    pub fn add_middleware(&mut self, middleware: Box<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run an action through the middleware chain, then the reducer.
    ///
    /// Any middleware returning `false` consumes the action.
    pub fn dispatch(&mut self, action: Action) {
        for middleware in self.middleware.iter_mut() {
            if !middleware.handle(&action, &self.state, &self.dispatcher) {
                return;
            }
        }

        let state = std::mem::take(&mut self.state);
        self.state = app_reducer::reduce(state, &action);
    }
}
