use super::StepId;

/// The loaded part of a step's console log.
///
/// `lines` always hold a contiguous suffix of the server-side log; `start_byte`
/// is where `lines[0]` begins. A `start_byte` of zero means the whole log is
/// loaded, anything greater means earlier bytes were not fetched yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBuffer {
    pub step_id: StepId,
    pub lines: Vec<String>,
    pub start_byte: u64,
}

impl LogBuffer {
    /// Empty buffer, created when a card is expanded for the first time.
    pub fn new(step_id: StepId) -> Self {
        Self {
            step_id,
            lines: Vec::new(),
            start_byte: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Bytes of the log that are known to exist before `lines[0]`.
    pub fn missing_bytes(&self) -> u64 {
        self.start_byte
    }

    pub fn is_complete(&self) -> bool {
        self.start_byte == 0
    }
}

/// True when the buffer holds lines but not the beginning of the log.
///
/// Also decides whether "show more" is interactive.
pub fn needs_warning(buffer: &LogBuffer) -> bool {
    !buffer.is_empty() && !buffer.is_complete()
}

/// Byte range handed to the log-fetch collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRange {
    /// The last `max_bytes` of the log: `[max(0, total - max_bytes), total)`.
    Tail { max_bytes: u64 },
    /// Bytes before the loaded part: `[start_byte, end_byte)`.
    Older { start_byte: u64, end_byte: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub step_id: StepId,
    pub range: FetchRange,
}

impl FetchRequest {
    pub fn tail(step_id: StepId, max_bytes: u64) -> Self {
        Self {
            step_id,
            range: FetchRange::Tail { max_bytes },
        }
    }

    pub fn older(step_id: StepId, start_byte: u64, end_byte: u64) -> Self {
        Self {
            step_id,
            range: FetchRange::Older {
                start_byte,
                end_byte,
            },
        }
    }

    /// Requested start offset, if known before the fetch.
    pub fn start_byte(&self) -> Option<u64> {
        match self.range {
            FetchRange::Tail { .. } => None,
            FetchRange::Older { start_byte, .. } => Some(start_byte),
        }
    }
}

/// Response of the log-fetch collaborator, normalized to lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchedChunk {
    pub lines: Vec<String>,
    /// Offset of the first returned line in the full log.
    pub new_start_byte: u64,
    pub has_more: bool,
}
