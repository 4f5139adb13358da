//! Configuration management for the extractor.
//!
//! Loads configuration from TOML files and provides runtime defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::ExtractionError;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Try select-all + copy before scrolling
    #[serde(default = "default_true")]
    pub selection_fast_path: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            selection_fast_path: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Ceiling for scroll actions in each direction
    #[serde(default = "default_max_scroll_attempts")]
    pub max_scroll_attempts: u32,

    /// Wait after each scroll before the next read or action
    #[serde(default = "default_scroll_settle")]
    pub scroll_settle_ms: u64,

    /// Wait after reaching the top before the first collection
    #[serde(default = "default_initial_settle")]
    pub initial_settle_ms: u64,

    /// Consecutive scrolls without new lines before stopping
    #[serde(default = "default_convergence_threshold")]
    pub convergence_threshold: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            max_scroll_attempts: default_max_scroll_attempts(),
            scroll_settle_ms: default_scroll_settle(),
            initial_settle_ms: default_initial_settle(),
            convergence_threshold: default_convergence_threshold(),
        }
    }
}

impl ScrollConfig {
    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn initial_settle(&self) -> Duration {
        Duration::from_millis(self.initial_settle_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Vertical slack before a node starts a new line
    #[serde(default = "default_line_tolerance")]
    pub line_tolerance: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_tolerance: default_line_tolerance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Wait after selecting before copying
    #[serde(default = "default_selection_settle")]
    pub select_settle_ms: u64,

    /// Wait after copying before reading the clipboard
    #[serde(default = "default_selection_settle")]
    pub copy_settle_ms: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            select_settle_ms: default_selection_settle(),
            copy_settle_ms: default_selection_settle(),
        }
    }
}

impl SelectionConfig {
    pub fn select_settle(&self) -> Duration {
        Duration::from_millis(self.select_settle_ms)
    }

    pub fn copy_settle(&self) -> Duration {
        Duration::from_millis(self.copy_settle_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Content descriptions to ignore in addition to the built-in list
    #[serde(default)]
    pub extra_blocked_labels: Vec<String>,
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_scroll_attempts() -> u32 {
    50
}

fn default_scroll_settle() -> u64 {
    300
}

fn default_initial_settle() -> u64 {
    500
}

fn default_convergence_threshold() -> u32 {
    3
}

fn default_line_tolerance() -> i32 {
    crate::layout::DEFAULT_LINE_TOLERANCE
}

fn default_selection_settle() -> u64 {
    100
}

impl ExtractorConfig {
    /// Load configuration from the default path
    pub fn load() -> Self {
        Self::load_from_path(Self::default_config_path())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: PathBuf) -> Self {
        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file found at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    /// Parse and validate a TOML document
    pub fn parse(contents: &str) -> Result<Self, ExtractionError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ExtractionError::Config(e.to_string()))?;
        Ok(config.validated())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("screen-text-extractor")
            .join("config.toml")
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<(), ExtractionError> {
        self.save_to_path(Self::default_config_path())
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: PathBuf) -> Result<(), ExtractionError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_toml()?)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ExtractionError> {
        toml::to_string_pretty(self).map_err(|e| ExtractionError::Config(e.to_string()))
    }

    /// Clamp values that would make the collector do nothing
    pub fn validated(mut self) -> Self {
        if self.scroll.max_scroll_attempts == 0 {
            warn!("max_scroll_attempts must be at least 1, using 1");
            self.scroll.max_scroll_attempts = 1;
        }
        if self.scroll.convergence_threshold == 0 {
            warn!("convergence_threshold must be at least 1, using 1");
            self.scroll.convergence_threshold = 1;
        }
        if self.layout.line_tolerance < 0 {
            warn!("line_tolerance cannot be negative, using 0");
            self.layout.line_tolerance = 0;
        }
        self
    }
}
