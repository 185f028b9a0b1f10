use pipeline_console_config::ConsoleConfig;
use pipeline_log_view::{
    widget::body_rows, ContainerSize, LogBuffer, StepCard, StepCardOptions, StepId, StepInfo,
};
use std::collections::HashMap;

/// State of the step list and all step cards
#[derive(Debug, Clone, Default)]
pub struct ConsoleState {
    /// Steps as delivered by the step source, in pipeline order
    pub steps: Vec<StepInfo>,
    /// Index of the selected step
    pub selected: usize,
    /// UI state per step (expanded, loading, error, scroll)
    pub cards: HashMap<StepId, StepCard>,
    /// Loaded logs; kept across collapse/expand so nothing is fetched twice
    pub buffers: HashMap<StepId, LogBuffer>,
    /// Area available to the step list, measured by the main loop
    pub container: ContainerSize,
    pub options: StepCardOptions,
    /// Set when the step list could not be loaded
    pub load_error: Option<String>,
}

impl ConsoleState {
    pub fn new(options: StepCardOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn selected_step(&self) -> Option<&StepInfo> {
        self.steps.get(self.selected)
    }

    pub fn selected_id(&self) -> Option<&StepId> {
        self.selected_step().map(|step| &step.id)
    }

    pub fn card(&self, step_id: &StepId) -> Option<&StepCard> {
        self.cards.get(step_id)
    }

    pub fn buffer(&self, step_id: &StepId) -> Option<&LogBuffer> {
        self.buffers.get(step_id)
    }

    pub fn is_expanded(&self, step_id: &StepId) -> bool {
        self.card(step_id).map(StepCard::is_expanded).unwrap_or(false)
    }

    /// Any fetch running (drives the spinner in the status bar)
    pub fn is_loading(&self) -> bool {
        self.cards.values().any(|card| card.loading)
    }

    pub fn has_step(&self, step_id: &StepId) -> bool {
        self.steps.iter().any(|step| &step.id == step_id)
    }

    /// Recompute the viewport height of a card from its loaded lines
    pub fn refresh_viewport(&mut self, step_id: &StepId) {
        let buffer = self.buffers.get(step_id);
        if let Some(card) = self.cards.get_mut(step_id) {
            let rows = body_rows(card, buffer, &self.options) as usize;
            let total = buffer.map(LogBuffer::len).unwrap_or(0);
            card.viewport.set_height(rows, total);
        }
    }

    pub fn refresh_all_viewports(&mut self) {
        let ids: Vec<StepId> = self.cards.keys().cloned().collect();
        for id in ids {
            self.refresh_viewport(&id);
        }
    }
}

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub running: bool,
    pub config: ConsoleConfig,
    pub console: ConsoleState,
    /// Current frame of the loading spinner
    pub tick: usize,
}

impl AppState {
    pub fn new(config: ConsoleConfig) -> Self {
        let options = StepCardOptions {
            show_line_numbers: config.show_line_numbers,
            max_body_rows: config.max_body_rows,
            overscan: config.overscan,
            ..StepCardOptions::default()
        };
        Self {
            running: true,
            console: ConsoleState::new(options),
            config,
            tick: 0,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ConsoleConfig::default())
    }
}
