//! File logger
//!
//! The terminal is owned by the UI, so log output goes to a file in the
//! system temp directory. `PIPELINE_CONSOLE_LOG` selects the level.

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

const LOG_LEVEL_ENV: &str = "PIPELINE_CONSOLE_LOG";

/// Initialize the file logger, returning the log file path on success
pub fn init() -> Option<PathBuf> {
    let level = level_from(std::env::var(LOG_LEVEL_ENV).ok().as_deref());
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let path = std::env::temp_dir().join(format!("pipeline-console-{}.log", timestamp));

    let file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to create log file {}: {}", path.display(), e);
            return None;
        }
    };

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    match WriteLogger::init(level, config, file) {
        Ok(()) => Some(path),
        Err(e) => {
            eprintln!("Failed to initialize logger: {}", e);
            None
        }
    }
}

/// Parse a level name, defaulting to `Debug`
fn level_from(raw: Option<&str>) -> LevelFilter {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(LevelFilter::Debug)
}
