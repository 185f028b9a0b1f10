use crate::state::ConsoleState;
use pipeline_log_view::{DefaultTheme, StepCardWidget};

const SPINNER_FRAMES: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

/// Height of a collapsed card: borders + header
const COLLAPSED_HEIGHT: u16 = 3;

/// Position of one card inside the step list area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSlot {
    /// Index into the step list
    pub index: usize,
    /// Offset from the top of the area
    pub y: u16,
    pub height: u16,
}

/// View model for the step list - handles layout and status bar text
pub struct ConsoleViewModel<'a> {
    state: &'a ConsoleState,
    tick: usize,
}

impl<'a> ConsoleViewModel<'a> {
    pub fn new(state: &'a ConsoleState, tick: usize) -> Self {
        Self { state, tick }
    }

    /// Full height of every card
    pub fn card_heights(&self) -> Vec<u16> {
        let theme = DefaultTheme;
        self.state
            .steps
            .iter()
            .map(|step| match self.state.card(&step.id) {
                Some(card) => StepCardWidget::new(step, card, self.state.buffer(&step.id), &theme)
                    .options(self.state.options)
                    .height(),
                None => COLLAPSED_HEIGHT,
            })
            .collect()
    }

    /// Cards to draw, scrolled so the selected card is visible.
    ///
    /// The first card is the topmost one that still lets every card up to
    /// and including the selection fit. The last card may be cut off.
    pub fn layout(&self, height: u16) -> Vec<CardSlot> {
        let heights = self.card_heights();
        if heights.is_empty() || height == 0 {
            return Vec::new();
        }

        let selected = self.state.selected.min(heights.len() - 1);
        let mut top = selected;
        let mut used = u32::from(heights[selected]);
        while top > 0 && used + u32::from(heights[top - 1]) <= u32::from(height) {
            top -= 1;
            used += u32::from(heights[top]);
        }

        let mut slots = Vec::new();
        let mut y = 0u16;
        for (index, card_height) in heights.iter().enumerate().skip(top) {
            if y >= height {
                break;
            }
            let visible = (*card_height).min(height - y);
            slots.push(CardSlot {
                index,
                y,
                height: visible,
            });
            y += visible;
        }
        slots
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()]
    }

    /// Left part of the status bar
    pub fn status(&self) -> String {
        if let Some(error) = &self.state.load_error {
            return format!("Failed to load steps: {}", error);
        }
        let position = if self.state.steps.is_empty() {
            "no steps".to_string()
        } else {
            format!("step {}/{}", self.state.selected + 1, self.state.steps.len())
        };
        if self.state.is_loading() {
            format!("{} {} loading…", position, self.spinner())
        } else {
            position
        }
    }

    /// Key hints for the right part of the status bar
    pub fn key_hints(&self) -> &'static str {
        let expanded = self
            .state
            .selected_id()
            .map(|id| self.state.is_expanded(id))
            .unwrap_or(false);
        if expanded {
            "j/k step  J/K scroll  h/l pan  g/G top/bottom  m more  enter collapse  q quit"
        } else {
            "j/k step  enter expand  q quit"
        }
    }
}
