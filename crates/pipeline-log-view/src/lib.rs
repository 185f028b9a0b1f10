//! Console-log step cards for CI pipeline viewers.
//!
//! This crate contains the parts of a step card that carry real state:
//!
//! - [`LogBuffer`]: the fetched tail of a step's log, plus the byte offset
//!   where the loaded part begins
//! - [`PaginationController`]: computes the next byte range to request and
//!   makes sure only one fetch per step is in flight
//! - [`VirtualizedLines`]: materializes only the rows inside the viewport
//! - [`StepCardWidget`]: a ratatui widget composing header, truncation
//!   warning and log rows
//!
//! Fetching itself is delegated to a [`LogFetcher`] implementation supplied
//! by the host application.
//!
//! # Example
//!
//! ```ignore
//! use pipeline_log_view::{PaginationController, LogBuffer, StepId};
//!
//! let mut pagination = PaginationController::new(150 * 1024);
//! let step = StepId::from("17");
//!
//! if let Some(request) = pagination.initial_request(&step, false) {
//!     let chunk = fetcher.fetch_log(&request).await?;
//!     let mut buffer = LogBuffer::new(step.clone());
//!     pagination.complete(&step);
//!     pipeline_log_view::merge_chunk(&mut buffer, chunk)?;
//! }
//! ```

pub mod card;
pub mod error;
pub mod model;
pub mod pagination;
pub mod traits;
pub mod virtualized;
pub mod widget;

pub use card::{
    CardState, ContainerSize, ExpandIndicator, RenderPhase, StepCard,
    StepCardOptions,
};
pub use error::{FetchError, PaginationError};
pub use model::{
    duration_label, needs_warning, pretty_size, FetchRange, FetchRequest, FetchedChunk, LogBuffer,
    StepHeader, StepId, StepInfo, StepState,
};
pub use pagination::{merge_chunk, older_start, PaginationController};
pub use traits::{DefaultTheme, LogFetcher, ThemeProvider};
pub use virtualized::{estimated_height, EstimateParams, RenderedRow, Viewport, VirtualizedLines};
pub use widget::{body_rows, content_width, StepCardWidget};
