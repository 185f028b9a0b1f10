use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AppState;

/// LoggingMiddleware - logs all actions passing through
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for LoggingMiddleware {
    fn handle(&mut self, action: &Action, _state: &AppState, _dispatcher: &Dispatcher) -> bool {
        match action {
            // Ticks would drown everything else
            Action::Tick => {}
            // Don't dump whole chunks into the log file
            Action::LogFetchCompleted { request, chunk } => {
                log::debug!(
                    "Action: LogFetchCompleted(step {}, {} lines from byte {})",
                    request.step_id,
                    chunk.lines.len(),
                    chunk.new_start_byte
                );
            }
            _ => log::debug!("Action: {:?}", action),
        }

        true // Always pass action through
    }
}
