//! Seams to the host application: log fetching and theming.

use crate::error::FetchError;
use crate::model::{FetchRequest, FetchedChunk, StepState};
use async_trait::async_trait;
use ratatui::style::{Color, Modifier, Style};

/// Fetches a bounded chunk of a step's console log.
///
/// Implementations must return lines in log order, with `new_start_byte`
/// pointing at the first byte of the first returned line.
#[async_trait]
pub trait LogFetcher: Send + Sync {
    async fn fetch_log(&self, request: &FetchRequest) -> Result<FetchedChunk, FetchError>;
}

/// Colors used by the step card widget.
pub trait ThemeProvider {
    fn card_border(&self, focused: bool) -> Style;
    fn header_title(&self) -> Style;
    fn header_label(&self) -> Style;
    fn state_color(&self, state: StepState) -> Color;
    fn line_number(&self) -> Style;
    fn line_content(&self) -> Style;
    fn warning(&self) -> Style;
    fn action_hint(&self, enabled: bool) -> Style;
    fn error(&self) -> Style;
    fn muted(&self) -> Style;
}

/// Plain 16-color theme.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTheme;

impl ThemeProvider for DefaultTheme {
    fn card_border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn header_title(&self) -> Style {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    }

    fn header_label(&self) -> Style {
        Style::default().fg(Color::Gray)
    }

    fn state_color(&self, state: StepState) -> Color {
        match state {
            StepState::Success => Color::Green,
            StepState::Failure => Color::Red,
            StepState::Unstable => Color::Yellow,
            StepState::Running | StepState::Queued | StepState::Paused => Color::Blue,
            StepState::Aborted | StepState::NotBuilt | StepState::Skipped => Color::DarkGray,
            StepState::Unknown => Color::Gray,
        }
    }

    fn line_number(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }

    fn line_content(&self) -> Style {
        Style::default()
    }

    fn warning(&self) -> Style {
        Style::default().fg(Color::Yellow)
    }

    fn action_hint(&self, enabled: bool) -> Style {
        if enabled {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn error(&self) -> Style {
        Style::default().fg(Color::Red)
    }

    fn muted(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }
}
