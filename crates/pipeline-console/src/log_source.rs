//! File backed step and log source
//!
//! A log directory holds `steps.json` (the step list) and one `<step id>.log`
//! per step. Without `steps.json` every `*.log` file becomes a step named
//! after its file stem.

use anyhow::Context;
use async_trait::async_trait;
use pipeline_log_view::{
    FetchError, FetchRange, FetchRequest, FetchedChunk, LogFetcher, StepId, StepInfo,
};
use std::io::SeekFrom;
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

pub const STEPS_FILE_NAME: &str = "steps.json";
const LOG_EXTENSION: &str = "log";

/// Delivers the step list shown by the console
pub trait StepSource: Send + Sync {
    fn load_steps(&self) -> anyhow::Result<Vec<StepInfo>>;
}

pub struct FileLogSource {
    log_dir: PathBuf,
}

impl FileLogSource {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    pub fn log_path(&self, step_id: &StepId) -> PathBuf {
        self.log_dir.join(format!("{}.{}", step_id, LOG_EXTENSION))
    }

    fn steps_from_log_files(&self) -> anyhow::Result<Vec<StepInfo>> {
        let entries = std::fs::read_dir(&self.log_dir)
            .with_context(|| format!("Failed to read log directory {}", self.log_dir.display()))?;

        let mut ids: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == LOG_EXTENSION))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        ids.sort();

        Ok(ids
            .into_iter()
            .map(|id| StepInfo {
                name: id.clone(),
                id: StepId::from(id),
                state: Default::default(),
                total_duration_millis: String::new(),
            })
            .collect())
    }
}

impl StepSource for FileLogSource {
    fn load_steps(&self) -> anyhow::Result<Vec<StepInfo>> {
        let steps_file = self.log_dir.join(STEPS_FILE_NAME);
        if !steps_file.exists() {
            log::info!(
                "No {} in {}, listing log files instead",
                STEPS_FILE_NAME,
                self.log_dir.display()
            );
            return self.steps_from_log_files();
        }

        let content = std::fs::read_to_string(&steps_file)
            .with_context(|| format!("Failed to read {}", steps_file.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", steps_file.display()))
    }
}

#[async_trait]
impl LogFetcher for FileLogSource {
    async fn fetch_log(&self, request: &FetchRequest) -> Result<FetchedChunk, FetchError> {
        let path = self.log_path(&request.step_id);
        let mut file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::NotFound(request.step_id.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        let total = file.metadata().await?.len();

        let (start, end) = match request.range {
            FetchRange::Tail { max_bytes } => (total.saturating_sub(max_bytes), total),
            FetchRange::Older {
                start_byte,
                end_byte,
            } => {
                if start_byte > end_byte || end_byte > total {
                    return Err(FetchError::InvalidRange {
                        step_id: request.step_id.clone(),
                        start: start_byte,
                        end: end_byte,
                    });
                }
                (start_byte, end_byte)
            }
        };

        // One extra byte in front tells whether `start` is a line start
        let lead = u64::from(start > 0);
        file.seek(SeekFrom::Start(start - lead)).await?;
        let mut bytes = vec![0u8; (end - start + lead) as usize];
        file.read_exact(&mut bytes).await?;

        let (previous, body) = bytes.split_at(lead as usize);
        let skip = line_start_offset(previous.first().copied(), body);
        let lines = String::from_utf8_lossy(&body[skip..])
            .lines()
            .map(str::to_string)
            .collect();
        let new_start_byte = start + skip as u64;

        Ok(FetchedChunk {
            lines,
            new_start_byte,
            has_more: new_start_byte > 0,
        })
    }
}

/// Offset into `body` of the first complete line.
///
/// A partial line is kept when nothing follows it, so every fetch makes
/// progress towards the start of the log.
fn line_start_offset(previous: Option<u8>, body: &[u8]) -> usize {
    match previous {
        None | Some(b'\n') => 0,
        Some(_) => match body.iter().position(|&b| b == b'\n') {
            Some(pos) if pos + 1 < body.len() => pos + 1,
            _ => 0,
        },
    }
}

/// Log directory from the first command line argument, if given
pub fn log_dir_from_args(mut args: impl Iterator<Item = String>) -> Option<PathBuf> {
    args.nth(1).map(PathBuf::from)
}
