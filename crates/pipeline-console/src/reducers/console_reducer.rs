use crate::actions::Action;
use crate::state::ConsoleState;
use pipeline_log_view::{content_width, merge_chunk, LogBuffer, StepCard, StepId, VirtualizedLines};
use std::collections::HashSet;

/// Reducer for the step list and step cards
pub fn reduce(mut state: ConsoleState, action: &Action) -> ConsoleState {
    match action {
        Action::StepsLoaded(steps) => {
            state.steps = steps.clone();
            state.load_error = None;
            state.selected = state.selected.min(steps.len().saturating_sub(1));

            // Cards and logs of steps that disappeared are discarded
            let ids: HashSet<&StepId> = steps.iter().map(|step| &step.id).collect();
            state.cards.retain(|id, _| ids.contains(id));
            state.buffers.retain(|id, _| ids.contains(id));
        }

        Action::StepsLoadError(message) => {
            state.load_error = Some(message.clone());
        }

        Action::GlobalResize(size) => {
            state.container = *size;
            state.refresh_all_viewports();
        }

        Action::NavigateNext => {
            if state.selected + 1 < state.steps.len() {
                state.selected += 1;
            }
        }

        Action::NavigatePrevious => {
            state.selected = state.selected.saturating_sub(1);
        }

        Action::StepToggle(step_id) => {
            let card_state = card_mut(&mut state, step_id).toggle();
            log::debug!("Step {} card: {:?}", step_id, card_state);
            state.refresh_viewport(step_id);
        }

        Action::LogScrollBy(delta) => {
            scroll_selected(&mut state, |card, total| {
                card.viewport.scroll_by(*delta, total)
            });
        }

        Action::LogScrollPage(direction) => {
            scroll_selected(&mut state, |card, total| {
                let page = card.viewport.height.max(1) as isize;
                card.viewport.scroll_by(direction.signum() * page, total)
            });
        }

        Action::LogPan(direction) => {
            let step = state.options.pan_step as isize;
            let width = state.container.width;
            let options = state.options;
            let (widest, visible) = match state.selected_id().and_then(|id| state.buffer(id)) {
                Some(buffer) => (
                    VirtualizedLines::new(&buffer.lines).widest(),
                    content_width(buffer, width, &options) as usize,
                ),
                None => (0, 0),
            };
            scroll_selected(&mut state, |card, _| {
                card.viewport.pan_by(direction.signum() * step, widest, visible)
            });
        }

        Action::LogScrollToTop => {
            scroll_selected(&mut state, |card, _| card.viewport.scroll_to_top());
        }

        Action::LogScrollToBottom => {
            scroll_selected(&mut state, |card, total| {
                card.viewport.scroll_to_bottom(total)
            });
        }

        Action::LogDismissError(step_id) => {
            if let Some(card) = state.cards.get_mut(step_id) {
                card.dismiss_error();
            }
            state.refresh_viewport(step_id);
        }

        // Results for steps that are no longer listed arrive late; drop them
        Action::LogFetchStarted(request)
        | Action::LogFetchCompleted { request, .. }
        | Action::LogFetchFailed { request, .. }
            if !state.has_step(&request.step_id) =>
        {
            log::debug!("Ignoring fetch result for unlisted step {}", request.step_id);
        }

        Action::LogFetchStarted(request) => {
            let card = card_mut(&mut state, &request.step_id);
            card.loading = true;
            card.error = None;
            state.refresh_viewport(&request.step_id);
        }

        Action::LogFetchCompleted { request, chunk } => {
            let step_id = &request.step_id;
            let buffer = state
                .buffers
                .entry(step_id.clone())
                .or_insert_with(|| LogBuffer::new(step_id.clone()));
            let first_load = buffer.is_empty();
            let merged = merge_chunk(buffer, chunk.clone());
            let total = buffer.len();

            let card = card_mut(&mut state, step_id);
            card.loading = false;
            if let Err(e) = &merged {
                log::warn!("Discarding chunk for step {}: {}", step_id, e);
                card.error = Some(e.to_string());
            }
            state.refresh_viewport(step_id);

            // The card keeps its expanded/collapsed state; only the scroll
            // position is adjusted so the same lines stay in view
            if let (Ok(added), Some(card)) = (merged, state.cards.get_mut(step_id)) {
                if first_load {
                    card.viewport.scroll_to_bottom(total);
                } else {
                    card.viewport.anchor_after_prepend(added);
                    card.viewport.clamp(total);
                }
            }
        }

        Action::LogFetchFailed { request, error } => {
            let card = card_mut(&mut state, &request.step_id);
            card.loading = false;
            card.error = Some(format!("Failed to load console log: {}", error));
            state.refresh_viewport(&request.step_id);
        }

        _ => {
            // Unhandled actions - no state change
        }
    }

    state
}

/// Card for a step, created collapsed on first use
fn card_mut<'a>(state: &'a mut ConsoleState, step_id: &StepId) -> &'a mut StepCard {
    let overscan = state.options.overscan;
    state.cards.entry(step_id.clone()).or_insert_with(|| {
        let mut card = StepCard::new(step_id.clone());
        card.viewport.overscan = overscan;
        card
    })
}

/// Apply a scroll operation to the selected card, if it is expanded
fn scroll_selected(state: &mut ConsoleState, scroll: impl FnOnce(&mut StepCard, usize)) {
    let Some(step_id) = state.selected_id().cloned() else {
        return;
    };
    let total = state.buffer(&step_id).map(LogBuffer::len).unwrap_or(0);
    if let Some(card) = state.cards.get_mut(&step_id) {
        if card.is_expanded() {
            scroll(card, total);
        }
    }
}
