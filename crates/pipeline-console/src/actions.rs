use pipeline_log_view::{ContainerSize, FetchRequest, FetchedChunk, StepId, StepInfo};
use ratatui::crossterm::event::KeyEvent;

/// Actions represent all possible state changes in the application.
/// Actions are prefixed by scope to indicate which part of the app they affect.
#[derive(Debug, Clone)]
pub enum Action {
    // Global actions (not tied to any specific view)
    GlobalKeyPressed(KeyEvent),
    GlobalQuit,
    /// Terminal area available to the step list changed
    GlobalResize(ContainerSize),

    // Bootstrap actions
    BootstrapStart,
    StepsLoaded(Vec<StepInfo>),
    StepsLoadError(String),

    // Navigation actions (semantic, vim-style)
    NavigateNext,     // j, down arrow
    NavigatePrevious, // k, up arrow

    // Step card actions
    StepToggle(StepId), // Enter, Space
    LogScrollBy(isize), // J / K
    LogScrollPage(isize), // Page Down / Page Up
    LogPan(isize),        // h / l, in steps of `pan_step` columns
    LogScrollToTop,     // g
    LogScrollToBottom,  // G
    LogShowMore(StepId), // m
    LogDismissError(StepId), // x

    // Log fetch lifecycle (dispatched by LogFetchMiddleware)
    LogFetchStarted(FetchRequest),
    LogFetchCompleted {
        request: FetchRequest,
        chunk: FetchedChunk,
    },
    LogFetchFailed {
        request: FetchRequest,
        error: String,
    },

    // Animation/Timer actions
    Tick, // Periodic tick for the loading spinner
}
