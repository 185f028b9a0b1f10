//! Step metadata supplied by the pipeline tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{AsRefStr, EnumString};

/// Identifier of a pipeline step (a flow node id on the server side).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StepId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Execution state of a step.
///
/// Finished steps report their result (`SUCCESS`, `FAILURE`, ...), unfinished
/// ones their lower-case run state (`running`, `queued`, ...). Parsing is
/// case-insensitive and never fails: anything unrecognised becomes `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
pub enum StepState {
    Success,
    Failure,
    Unstable,
    Aborted,
    NotBuilt,
    Skipped,
    Running,
    Queued,
    Paused,
    #[default]
    Unknown,
}

impl StepState {
    pub fn parse(raw: &str) -> Self {
        Self::from_str(raw.trim()).unwrap_or(Self::Unknown)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StepState::Success => "✓",
            StepState::Failure => "✗",
            StepState::Unstable => "!",
            StepState::Aborted => "⊘",
            StepState::NotBuilt | StepState::Skipped => "⊝",
            StepState::Running => "⋯",
            StepState::Queued | StepState::Paused => "⏸",
            StepState::Unknown => "?",
        }
    }

    /// Class name of the header, e.g. `step-header-success`.
    pub fn header_class(&self) -> String {
        format!("step-header-{}", self.as_ref())
    }
}

impl Serialize for StepState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}

impl<'de> Deserialize<'de> for StepState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// A step as delivered by the pipeline tree. Read-only for the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInfo {
    pub id: StepId,
    pub name: String,
    #[serde(default)]
    pub state: StepState,
    /// Human readable timing, e.g. `"started 42ms"`.
    #[serde(default)]
    pub total_duration_millis: String,
}

impl StepInfo {
    pub fn header(&self) -> StepHeader {
        StepHeader::split(&self.name)
    }

    pub fn duration_label(&self) -> &str {
        duration_label(&self.total_duration_millis)
    }
}

/// Display name split into title and trailing label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepHeader {
    pub title: String,
    pub label: String,
}

impl StepHeader {
    /// Splits at the last `-`.
    ///
    /// `"build-42ms"` becomes title `"build"` and label `"42ms"`. A name
    /// without `-` keeps the whole name as title and an empty label.
    pub fn split(name: &str) -> Self {
        match name.rfind('-') {
            Some(idx) => Self {
                title: name[..idx].trim_end().to_string(),
                label: name[idx + 1..].trim_start().to_string(),
            },
            None => Self {
                title: name.to_string(),
                label: String::new(),
            },
        }
    }
}

/// Everything after the first space, or the whole string if there is none.
pub fn duration_label(total_duration: &str) -> &str {
    match total_duration.find(' ') {
        Some(idx) => &total_duration[idx + 1..],
        None => total_duration,
    }
}
