//! Log Fetch Middleware
//!
//! Handles side effects for loading step console logs:
//! - Fetches the tail of a step's log when its card is expanded and no
//!   buffer exists yet
//! - Fetches the preceding chunk on "show more logs"
//! - Owns the pagination controller, so at most one fetch per step is in
//!   flight; the flag is cleared when the fetch completes or fails, or when
//!   the step vanishes from a reloaded step list
//!
//! Fetches run on the tokio runtime and report back through the dispatcher.

use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AppState;
use pipeline_log_view::{FetchRequest, LogFetcher, PaginationController};
use std::sync::Arc;

pub struct LogFetchMiddleware {
    fetcher: Arc<dyn LogFetcher>,
    pagination: PaginationController,
    /// Tokio runtime for async operations
    runtime: tokio::runtime::Handle,
}

impl LogFetchMiddleware {
    pub fn new(
        fetcher: Arc<dyn LogFetcher>,
        fetch_size: u64,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        Self {
            fetcher,
            pagination: PaginationController::new(fetch_size),
            runtime,
        }
    }

    fn spawn_fetch(&self, request: FetchRequest, dispatcher: &Dispatcher) {
        log::info!(
            "Fetching console log for step {} ({:?})",
            request.step_id,
            request.range
        );
        dispatcher.dispatch(Action::LogFetchStarted(request.clone()));

        let fetcher = self.fetcher.clone();
        let dispatcher = dispatcher.clone();
        self.runtime.spawn(async move {
            match fetcher.fetch_log(&request).await {
                Ok(chunk) => {
                    log::info!(
                        "Fetched {} lines for step {} starting at byte {}",
                        chunk.lines.len(),
                        request.step_id,
                        chunk.new_start_byte
                    );
                    dispatcher.dispatch(Action::LogFetchCompleted { request, chunk });
                }
                Err(e) => {
                    log::warn!("Fetching log for step {} failed: {}", request.step_id, e);
                    dispatcher.dispatch(Action::LogFetchFailed {
                        request,
                        error: e.to_string(),
                    });
                }
            }
        });
    }
}

impl Middleware for LogFetchMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        match action {
            Action::StepToggle(step_id) => {
                // Only the transition into Expanded may fetch
                if !state.console.is_expanded(step_id) {
                    let has_buffer = state.console.buffer(step_id).is_some();
                    if let Some(request) = self.pagination.initial_request(step_id, has_buffer) {
                        self.spawn_fetch(request, dispatcher);
                    }
                }
                true // Reducer flips the card
            }

            Action::LogShowMore(step_id) => {
                match state.console.buffer(step_id) {
                    Some(buffer) => match self.pagination.request_older(buffer) {
                        Some(request) => self.spawn_fetch(request, dispatcher),
                        None => log::debug!(
                            "Show more for step {} ignored (complete or in flight)",
                            step_id
                        ),
                    },
                    None => log::debug!("Show more for step {} without a buffer", step_id),
                }
                false // Consume action
            }

            Action::StepsLoaded(steps) => {
                for old in &state.console.steps {
                    if !steps.iter().any(|step| step.id == old.id) {
                        self.pagination.forget(&old.id);
                    }
                }
                true
            }

            Action::LogFetchCompleted { request, .. } => {
                self.pagination.complete(&request.step_id);
                true
            }

            Action::LogFetchFailed { request, .. } => {
                self.pagination.fail(&request.step_id);
                true
            }

            _ => true, // Pass through other actions
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducers::app_reducer;
    use async_trait::async_trait;
    use pipeline_log_view::{
        FetchError, FetchRange, FetchedChunk, StepId, StepInfo, StepState,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers every request with one line starting at the requested offset
    struct CountingFetcher {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingFetcher {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl LogFetcher for CountingFetcher {
        async fn fetch_log(&self, request: &FetchRequest) -> Result<FetchedChunk, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FetchError::NotFound(request.step_id.clone()));
            }
            let start = match request.range {
                FetchRange::Tail { .. } => 1000,
                FetchRange::Older { start_byte, .. } => start_byte,
            };
            Ok(FetchedChunk {
                lines: vec![format!("from {}", start)],
                new_start_byte: start,
                has_more: start > 0,
            })
        }
    }

    fn step_id() -> StepId {
        StepId::from("12")
    }

    fn loaded_state() -> AppState {
        let step = StepInfo {
            id: step_id(),
            name: "compile - Shell Script".to_string(),
            state: StepState::Success,
            total_duration_millis: "took 3s".to_string(),
        };
        app_reducer::reduce(AppState::default(), &Action::StepsLoaded(vec![step]))
    }

    /// Minimal store loop: middleware, then reducer, for every queued action,
    /// until `results` fetches have reported back
    fn settle(
        middleware: &mut LogFetchMiddleware,
        mut state: AppState,
        dispatcher: &Dispatcher,
        results: usize,
    ) -> AppState {
        let mut seen = 0;
        for _ in 0..400 {
            while let Some(action) = dispatcher.pop() {
                if matches!(
                    action,
                    Action::LogFetchCompleted { .. } | Action::LogFetchFailed { .. }
                ) {
                    seen += 1;
                }
                if middleware.handle(&action, &state, dispatcher) {
                    state = app_reducer::reduce(state, &action);
                }
            }
            if seen >= results {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        state
    }

    fn setup(fail: bool) -> (tokio::runtime::Runtime, Arc<CountingFetcher>, LogFetchMiddleware) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let fetcher = CountingFetcher::new(fail);
        let middleware = LogFetchMiddleware::new(fetcher.clone(), 100, runtime.handle().clone());
        (runtime, fetcher, middleware)
    }

    #[test]
    fn test_expand_fetches_tail_once() {
        let (_runtime, fetcher, mut middleware) = setup(false);
        let dispatcher = Dispatcher::new();

        dispatcher.dispatch(Action::StepToggle(step_id()));
        let state = settle(&mut middleware, loaded_state(), &dispatcher, 1);

        let buffer = state.console.buffer(&step_id()).unwrap();
        assert_eq!(buffer.lines, vec!["from 1000"]);
        assert_eq!(buffer.start_byte, 1000);
        assert!(!state.console.card(&step_id()).unwrap().loading);

        // Collapse and re-expand: the buffer is reused, nothing is fetched
        dispatcher.dispatch(Action::StepToggle(step_id()));
        dispatcher.dispatch(Action::StepToggle(step_id()));
        let state = settle(&mut middleware, state, &dispatcher, 0);
        assert!(state.console.is_expanded(&step_id()));
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_show_more_is_deduplicated_while_in_flight() {
        let (_runtime, fetcher, mut middleware) = setup(false);
        let dispatcher = Dispatcher::new();

        dispatcher.dispatch(Action::StepToggle(step_id()));
        let state = settle(&mut middleware, loaded_state(), &dispatcher, 1);

        // Two clicks before the first fetch resolves
        dispatcher.dispatch(Action::LogShowMore(step_id()));
        dispatcher.dispatch(Action::LogShowMore(step_id()));
        let state = settle(&mut middleware, state, &dispatcher, 1);

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);

        let buffer = state.console.buffer(&step_id()).unwrap();
        assert_eq!(buffer.lines, vec!["from 900", "from 1000"]);
        assert_eq!(buffer.start_byte, 900);
    }

    #[test]
    fn test_reload_forgets_vanished_steps() {
        let (_runtime, _fetcher, mut middleware) = setup(false);
        let dispatcher = Dispatcher::new();
        let state = loaded_state();

        middleware.handle(&Action::StepToggle(step_id()), &state, &dispatcher);
        assert!(middleware.pagination.is_in_flight(&step_id()));

        middleware.handle(&Action::StepsLoaded(Vec::new()), &state, &dispatcher);
        assert!(!middleware.pagination.is_in_flight(&step_id()));
    }

    #[test]
    fn test_failure_clears_flag_and_keeps_buffer() {
        let (_runtime, fetcher, mut middleware) = setup(true);
        let dispatcher = Dispatcher::new();

        dispatcher.dispatch(Action::StepToggle(step_id()));
        let state = settle(&mut middleware, loaded_state(), &dispatcher, 1);

        let card = state.console.card(&step_id()).unwrap();
        assert!(card.error.is_some());
        assert!(!card.loading);
        assert!(card.is_expanded());
        assert!(state.console.buffer(&step_id()).is_none());

        // Collapse and expand again retries the initial fetch
        dispatcher.dispatch(Action::StepToggle(step_id()));
        dispatcher.dispatch(Action::StepToggle(step_id()));
        settle(&mut middleware, state, &dispatcher, 1);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }
}
