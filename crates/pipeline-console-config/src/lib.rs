//! Configuration for pipeline-console.
//!
//! The config file `pipeline-console.toml` is looked up in the current
//! working directory first, then in the home directory.

mod console_config;

pub use console_config::ConsoleConfig;

use std::fs;
use std::path::PathBuf;

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "pipeline-console.toml";

/// Candidate config file locations, in lookup order.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(format!(".{}", CONFIG_FILE_NAME)));
    }
    paths
}

/// Read the first config file that exists.
pub fn load_config_file() -> Option<String> {
    for path in config_paths() {
        match fs::read_to_string(&path) {
            Ok(content) => {
                log::debug!("Found config file at {}", path.display());
                return Some(content);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                log::warn!("Failed to read config file {}: {}", path.display(), e);
            }
        }
    }
    None
}
