//! Step card state machine.

use crate::model::StepId;
use crate::virtualized::Viewport;

/// Collapsed or expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardState {
    #[default]
    Collapsed,
    Expanded,
}

impl CardState {
    pub fn toggle(self) -> Self {
        match self {
            CardState::Collapsed => CardState::Expanded,
            CardState::Expanded => CardState::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == CardState::Expanded
    }
}

/// The expand button: a boolean plus the rotation derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpandIndicator {
    pub expanded: bool,
}

impl ExpandIndicator {
    pub fn new(expanded: bool) -> Self {
        Self { expanded }
    }

    pub fn rotation_degrees(&self) -> u16 {
        if self.expanded {
            180
        } else {
            0
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self.rotation_degrees() {
            180 => "▼",
            _ => "▶",
        }
    }
}

/// Two-phase body rendering: a placeholder until the first chunk arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Placeholder,
    Ready,
}

/// Visual options passed through to the card widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCardOptions {
    pub show_line_numbers: bool,
    /// Upper bound for the log body height, in rows.
    pub max_body_rows: u16,
    pub overscan: usize,
    /// Columns moved per horizontal pan.
    pub pan_step: u16,
}

impl Default for StepCardOptions {
    fn default() -> Self {
        Self {
            show_line_numbers: true,
            max_body_rows: 20,
            overscan: 2,
            pan_step: 8,
        }
    }
}

/// Size of the area the card may occupy, measured by the owning layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerSize {
    pub width: u16,
    pub height: u16,
}

impl ContainerSize {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// UI state of one step card. The log itself lives in a separate
/// [`LogBuffer`](crate::LogBuffer) so it survives collapse and re-expand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCard {
    pub step_id: StepId,
    pub state: CardState,
    /// A fetch for this step is in flight.
    pub loading: bool,
    /// Last fetch failure, shown until dismissed.
    pub error: Option<String>,
    pub viewport: Viewport,
}

impl StepCard {
    pub fn new(step_id: StepId) -> Self {
        Self {
            step_id,
            state: CardState::Collapsed,
            loading: false,
            error: None,
            viewport: Viewport::default(),
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.state.is_expanded()
    }

    pub fn indicator(&self) -> ExpandIndicator {
        ExpandIndicator::new(self.is_expanded())
    }

    /// Flips the card and returns the new state. Whether expanding needs a
    /// fetch depends on the loaded log, not on the card.
    pub fn toggle(&mut self) -> CardState {
        self.state = self.state.toggle();
        self.state
    }

    pub fn phase(&self, has_buffer: bool) -> RenderPhase {
        if !has_buffer && self.loading {
            RenderPhase::Placeholder
        } else {
            RenderPhase::Ready
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
