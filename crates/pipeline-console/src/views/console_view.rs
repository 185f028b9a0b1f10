use crate::state::ConsoleState;
use crate::view_models::console_view_model::ConsoleViewModel;
use pipeline_log_view::{DefaultTheme, StepCard, StepCardWidget};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Widget},
};

/// Render the step cards, the selected one focused
pub fn render(state: &ConsoleState, area: Rect, buf: &mut Buffer) {
    if state.steps.is_empty() {
        let text = match &state.load_error {
            Some(_) => "No steps could be loaded",
            None => "Waiting for steps…",
        };
        Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .render(area, buf);
        return;
    }

    let theme = DefaultTheme;
    let view_model = ConsoleViewModel::new(state, 0);

    for slot in view_model.layout(area.height) {
        let step = &state.steps[slot.index];
        // Steps never toggled have no card yet
        let collapsed;
        let card = match state.card(&step.id) {
            Some(card) => card,
            None => {
                collapsed = StepCard::new(step.id.clone());
                &collapsed
            }
        };

        StepCardWidget::new(step, card, state.buffer(&step.id), &theme)
            .options(state.options)
            .focused(slot.index == state.selected)
            .render(slot_area(area, slot.y, slot.height), buf);
    }
}

fn slot_area(area: Rect, y: u16, height: u16) -> Rect {
    Rect {
        x: area.x,
        y: area.y + y,
        width: area.width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use crate::reducers::console_reducer;
    use pipeline_log_view::{
        ContainerSize, FetchRequest, FetchedChunk, StepCardOptions, StepId, StepInfo, StepState,
    };

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    fn loaded_state() -> ConsoleState {
        let steps = vec![
            StepInfo {
                id: StepId::from("1"),
                name: "checkout - Git".to_string(),
                state: StepState::Success,
                total_duration_millis: "took 1s".to_string(),
            },
            StepInfo {
                id: StepId::from("2"),
                name: "build - Shell Script".to_string(),
                state: StepState::Failure,
                total_duration_millis: "took 9s".to_string(),
            },
        ];
        let options = StepCardOptions {
            max_body_rows: 4,
            ..StepCardOptions::default()
        };
        let state = console_reducer::reduce(ConsoleState::new(options), &Action::StepsLoaded(steps));
        console_reducer::reduce(state, &Action::GlobalResize(ContainerSize::new(50, 20)))
    }

    #[test]
    fn test_renders_collapsed_cards() {
        let state = loaded_state();
        let area = Rect::new(0, 0, 50, 20);
        let mut buf = Buffer::empty(area);
        render(&state, area, &mut buf);

        assert!(row(&buf, 1).contains("checkout"));
        assert!(row(&buf, 4).contains("build"));
        assert!(row(&buf, 4).contains("9s"));
    }

    #[test]
    fn test_renders_expanded_log_tail() {
        let id = StepId::from("2");
        let state = console_reducer::reduce(loaded_state(), &Action::StepToggle(id.clone()));
        let state = console_reducer::reduce(
            state,
            &Action::LogFetchCompleted {
                request: FetchRequest::tail(id, 100),
                chunk: FetchedChunk {
                    lines: (1..=10).map(|i| format!("output {}", i)).collect(),
                    new_start_byte: 2048,
                    has_more: true,
                },
            },
        );
        let area = Rect::new(0, 0, 50, 20);
        let mut buf = Buffer::empty(area);
        render(&state, area, &mut buf);

        // Second card starts at row 3: border, header, warning, body
        assert!(row(&buf, 5).contains("Missing 2.00KiB of logs."));
        assert!(row(&buf, 6).contains("output 7"));
        assert!(row(&buf, 9).contains("output 10"));
    }

    #[test]
    fn test_empty_step_list_shows_hint() {
        let state = ConsoleState::default();
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        render(&state, area, &mut buf);
        assert!(row(&buf, 0).contains("Waiting for steps"));
    }
}
