//! Console configuration
//!
//! Configuration loaded from pipeline-console.toml file.

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Console configuration loaded from pipeline-console.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Bytes requested per "show more logs" step
    #[serde(default = "default_fetch_size")]
    pub fetch_size: u64,

    /// Directory holding `steps.json` and one `<step id>.log` per step
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Maximum height of an expanded card's log body, in rows
    #[serde(default = "default_max_body_rows")]
    pub max_body_rows: u16,

    /// Rows materialized above and below the visible log window
    #[serde(default = "default_overscan")]
    pub overscan: usize,

    #[serde(default = "default_show_line_numbers")]
    pub show_line_numbers: bool,

    /// Interval of the UI tick (loading indicator refresh)
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_fetch_size() -> u64 {
    150 * 1024
}

fn default_log_dir() -> String {
    ".".to_string()
}

fn default_max_body_rows() -> u16 {
    20
}

fn default_overscan() -> usize {
    2
}

fn default_show_line_numbers() -> bool {
    true
}

fn default_tick_rate_ms() -> u64 {
    200
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            fetch_size: default_fetch_size(),
            log_dir: default_log_dir(),
            max_body_rows: default_max_body_rows(),
            overscan: default_overscan(),
            show_line_numbers: default_show_line_numbers(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl ConsoleConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match Self::parse(&content) {
                Ok(config) => {
                    log::info!("Loaded console config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {:#}", e);
                }
            }
        }

        log::debug!("Using default console config");
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content).context("invalid pipeline-console.toml")?;
        if config.fetch_size == 0 {
            anyhow::bail!("fetch_size must be greater than zero");
        }
        Ok(config)
    }

    /// Override the log directory (e.g. from the command line)
    pub fn with_log_dir(mut self, log_dir: impl Into<String>) -> Self {
        self.log_dir = log_dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConsoleConfig::default();
        assert_eq!(config.fetch_size, 153_600);
        assert_eq!(config.log_dir, ".");
        assert!(config.show_line_numbers);
        assert_eq!(config.overscan, 2);
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            fetch_size = 4096
            log_dir = "/var/log/ci"
            show_line_numbers = false
        "#;
        let config = ConsoleConfig::parse(toml).unwrap();
        assert_eq!(config.fetch_size, 4096);
        assert_eq!(config.log_dir, "/var/log/ci");
        assert!(!config.show_line_numbers);
        // max_body_rows should use default
        assert_eq!(config.max_body_rows, 20);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            max_body_rows = 40
        "#;
        let config = ConsoleConfig::parse(toml).unwrap();
        assert_eq!(config.max_body_rows, 40);
        // Other fields should use defaults
        assert_eq!(config.fetch_size, 150 * 1024);
        assert_eq!(config.tick_rate_ms, 200);
    }

    #[test]
    fn test_zero_fetch_size_is_rejected() {
        assert!(ConsoleConfig::parse("fetch_size = 0").is_err());
    }

    #[test]
    fn test_with_log_dir() {
        let config = ConsoleConfig::default().with_log_dir("logs");
        assert_eq!(config.log_dir, "logs");
    }
}
