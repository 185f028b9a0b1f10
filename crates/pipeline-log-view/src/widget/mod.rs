//! ratatui widgets.

mod step_card;

pub use step_card::{body_rows, content_width, StepCardWidget};
