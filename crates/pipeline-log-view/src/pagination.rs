//! Byte-offset pagination of step logs.
//!
//! "Show more" always walks backwards through the log: each request covers
//! the `chunk_size` bytes ending where the loaded part begins, clamped at
//! offset zero. Results are prepended to the [`LogBuffer`].

use crate::error::PaginationError;
use crate::model::{needs_warning, FetchRequest, FetchedChunk, LogBuffer, StepId};
use std::collections::HashSet;

/// Start offset of the chunk preceding `start_byte`.
///
/// Repeated application reaches zero and stays there.
pub fn older_start(start_byte: u64, chunk_size: u64) -> u64 {
    start_byte.saturating_sub(chunk_size)
}

/// Issues fetch requests and tracks which steps have one in flight.
///
/// Lives on the UI event loop; the in-flight set is the only guard against
/// overlapping fetches for the same step.
#[derive(Debug, Clone)]
pub struct PaginationController {
    chunk_size: u64,
    in_flight: HashSet<StepId>,
}

impl PaginationController {
    pub fn new(chunk_size: u64) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            in_flight: HashSet::new(),
        }
    }

    pub fn is_in_flight(&self, step_id: &StepId) -> bool {
        self.in_flight.contains(step_id)
    }

    /// Request for the tail of the log when a card is expanded the first time.
    ///
    /// Returns `None` if the step already has a buffer or a fetch is running.
    pub fn initial_request(&mut self, step_id: &StepId, has_buffer: bool) -> Option<FetchRequest> {
        if has_buffer || !self.in_flight.insert(step_id.clone()) {
            return None;
        }
        log::debug!(
            "Initial log request for step {} (last {} bytes)",
            step_id,
            self.chunk_size
        );
        Some(FetchRequest::tail(step_id.clone(), self.chunk_size))
    }

    /// Request for the chunk preceding the loaded part of `buffer`.
    ///
    /// A no-op (`None`) once the whole log is loaded or while a fetch for the
    /// step is still running.
    pub fn request_older(&mut self, buffer: &LogBuffer) -> Option<FetchRequest> {
        if !needs_warning(buffer) {
            return None;
        }
        if !self.in_flight.insert(buffer.step_id.clone()) {
            log::debug!("Fetch for step {} already in flight", buffer.step_id);
            return None;
        }

        let start_byte = older_start(buffer.start_byte, self.chunk_size);
        log::debug!(
            "startByte '{}' -> '{}' for step {}",
            buffer.start_byte,
            start_byte,
            buffer.step_id
        );
        Some(FetchRequest::older(
            buffer.step_id.clone(),
            start_byte,
            buffer.start_byte,
        ))
    }

    /// Fetch finished; the chunk is merged by the caller.
    pub fn complete(&mut self, step_id: &StepId) {
        self.in_flight.remove(step_id);
    }

    /// Fetch failed; clearing the flag makes a retry possible.
    pub fn fail(&mut self, step_id: &StepId) {
        self.in_flight.remove(step_id);
    }

    /// Forget a step entirely, e.g. when its card is discarded.
    pub fn forget(&mut self, step_id: &StepId) {
        self.in_flight.remove(step_id);
    }
}

/// Merges a fetched chunk into `buffer`.
///
/// The first chunk fills an empty buffer. Later chunks hold older bytes and
/// are prepended; they must start strictly before the loaded part, otherwise
/// the buffer is left untouched. Returns the number of prepended lines.
pub fn merge_chunk(buffer: &mut LogBuffer, chunk: FetchedChunk) -> Result<usize, PaginationError> {
    if buffer.lines.is_empty() {
        let added = chunk.lines.len();
        buffer.lines = chunk.lines;
        buffer.start_byte = chunk.new_start_byte;
        return Ok(added);
    }

    if chunk.new_start_byte >= buffer.start_byte {
        return Err(PaginationError::NonMonotonicOffset {
            current: buffer.start_byte,
            new_start: chunk.new_start_byte,
        });
    }

    let added = chunk.lines.len();
    let mut lines = chunk.lines;
    lines.append(&mut buffer.lines);
    buffer.lines = lines;
    buffer.start_byte = chunk.new_start_byte;

    if !chunk.has_more && buffer.start_byte != 0 {
        log::warn!(
            "Fetcher reported no more logs for step {} but start byte is {}",
            buffer.step_id,
            buffer.start_byte
        );
    }

    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FetchRange;
    use pretty_assertions::assert_eq;

    const CHUNK: u64 = 100;

    fn step() -> StepId {
        StepId::from("7")
    }

    fn loaded(lines: &[&str], start_byte: u64) -> LogBuffer {
        LogBuffer {
            step_id: step(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
            start_byte,
        }
    }

    fn chunk(lines: &[&str], new_start_byte: u64) -> FetchedChunk {
        FetchedChunk {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            new_start_byte,
            has_more: new_start_byte > 0,
        }
    }

    #[test]
    fn test_older_start_reaches_fixed_point() {
        let mut start = 1234;
        let mut steps = 0;
        while start > 0 {
            let next = older_start(start, CHUNK);
            assert_eq!(next, start.saturating_sub(CHUNK));
            start = next;
            steps += 1;
        }
        assert_eq!(steps, 13);
        assert_eq!(older_start(0, CHUNK), 0);
        assert_eq!(older_start(older_start(0, CHUNK), CHUNK), 0);
    }

    #[test]
    fn test_request_older_range() {
        let mut pagination = PaginationController::new(CHUNK);
        let request = pagination.request_older(&loaded(&["x"], 250)).unwrap();
        assert_eq!(
            request.range,
            FetchRange::Older {
                start_byte: 150,
                end_byte: 250
            }
        );
        assert!(pagination.is_in_flight(&step()));
    }

    #[test]
    fn test_request_older_clamps_at_zero() {
        let mut pagination = PaginationController::new(CHUNK);
        let request = pagination.request_older(&loaded(&["x"], 30)).unwrap();
        assert_eq!(request.start_byte(), Some(0));
    }

    #[test]
    fn test_request_older_is_noop_at_boundary() {
        let mut pagination = PaginationController::new(CHUNK);
        assert_eq!(pagination.request_older(&loaded(&["x"], 0)), None);
        assert_eq!(pagination.request_older(&loaded(&[], 500)), None);
        assert!(!pagination.is_in_flight(&step()));
    }

    #[test]
    fn test_no_overlapping_requests() {
        let mut pagination = PaginationController::new(CHUNK);
        let buffer = loaded(&["x"], 500);

        assert!(pagination.request_older(&buffer).is_some());
        assert_eq!(pagination.request_older(&buffer), None);

        pagination.complete(&step());
        assert!(pagination.request_older(&buffer).is_some());
    }

    #[test]
    fn test_failure_allows_retry() {
        let mut pagination = PaginationController::new(CHUNK);
        let buffer = loaded(&["x"], 500);

        let first = pagination.request_older(&buffer).unwrap();
        pagination.fail(&step());
        let retry = pagination.request_older(&buffer).unwrap();
        assert_eq!(first, retry);
    }

    #[test]
    fn test_initial_request() {
        let mut pagination = PaginationController::new(CHUNK);
        assert_eq!(pagination.initial_request(&step(), true), None);

        let request = pagination.initial_request(&step(), false).unwrap();
        assert_eq!(request.range, FetchRange::Tail { max_bytes: CHUNK });
        assert_eq!(pagination.initial_request(&step(), false), None);

        // other steps are independent
        assert!(pagination
            .initial_request(&StepId::from("8"), false)
            .is_some());
    }

    #[test]
    fn test_first_merge_fills_buffer() {
        let mut buffer = LogBuffer::new(step());
        let added = merge_chunk(&mut buffer, chunk(&["c", "d"], 400)).unwrap();
        assert_eq!(added, 2);
        assert_eq!(buffer.lines, vec!["c", "d"]);
        assert_eq!(buffer.start_byte, 400);
    }

    #[test]
    fn test_merge_prepends_older_lines() {
        let mut buffer = loaded(&["c", "d"], 400);
        let added = merge_chunk(&mut buffer, chunk(&["a", "b"], 300)).unwrap();
        assert_eq!(added, 2);
        assert_eq!(buffer.lines, vec!["a", "b", "c", "d"]);
        assert_eq!(buffer.start_byte, 300);
    }

    #[test]
    fn test_merge_never_shrinks() {
        let mut buffer = loaded(&["c", "d"], 400);
        let before = buffer.len();
        merge_chunk(&mut buffer, chunk(&[], 350)).unwrap();
        assert!(buffer.len() >= before);
        assert_eq!(buffer.start_byte, 350);
    }

    #[test]
    fn test_merge_rejects_stale_chunk() {
        let mut buffer = loaded(&["c", "d"], 400);
        let snapshot = buffer.clone();

        let err = merge_chunk(&mut buffer, chunk(&["z"], 400)).unwrap_err();
        assert_eq!(
            err,
            PaginationError::NonMonotonicOffset {
                current: 400,
                new_start: 400
            }
        );
        assert_eq!(buffer, snapshot);
    }

    #[test]
    fn test_paginate_until_complete() {
        let mut pagination = PaginationController::new(CHUNK);
        let mut buffer = LogBuffer::new(step());

        pagination.initial_request(&step(), false).unwrap();
        pagination.complete(&step());
        merge_chunk(&mut buffer, chunk(&["line 3"], 220)).unwrap();

        let mut requests = 0;
        while let Some(request) = pagination.request_older(&buffer) {
            let start = request.start_byte().unwrap();
            pagination.complete(&step());
            merge_chunk(&mut buffer, chunk(&["older"], start)).unwrap();
            requests += 1;
        }

        assert_eq!(requests, 3);
        assert_eq!(buffer.start_byte, 0);
        assert_eq!(buffer.len(), 4);
        assert!(!needs_warning(&buffer));
    }
}
