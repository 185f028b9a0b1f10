//! Data model for step cards.

mod log_buffer;
mod size;
mod step;

pub use log_buffer::{needs_warning, FetchRange, FetchRequest, FetchedChunk, LogBuffer};
pub use size::pretty_size;
pub use step::{duration_label, StepHeader, StepId, StepInfo, StepState};
