//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/skillscope/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/skillscope/` (~/.config/skillscope/)
//! - State/Logs: `$XDG_STATE_HOME/skillscope/` (~/.local/state/skillscope/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Analysis thresholds and windows
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Path overrides for discovery and ingestion
    #[serde(default)]
    pub paths: PathOverrides,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analysis thresholds and windows
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum confidence for a match to count as a missed opportunity
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Distinct triggers required for a match (name match bypasses this)
    #[serde(default = "default_min_triggers")]
    pub min_triggers: usize,

    /// Recency window in days for impact scoring
    #[serde(default = "default_analysis_period_days")]
    pub analysis_period_days: u32,

    /// Enable the semantic near-duplicate pass of overlap detection
    #[serde(default = "default_semantic_enabled")]
    pub semantic_enabled: bool,

    /// Jaccard similarity threshold for semantic overlap
    #[serde(default = "default_semantic_threshold")]
    pub semantic_threshold: f64,

    /// Most recent sessions to analyze per project
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Overlap findings to keep after ranking
    #[serde(default = "default_max_findings")]
    pub max_findings: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            min_triggers: default_min_triggers(),
            analysis_period_days: default_analysis_period_days(),
            semantic_enabled: default_semantic_enabled(),
            semantic_threshold: default_semantic_threshold(),
            max_sessions: default_max_sessions(),
            max_findings: default_max_findings(),
        }
    }
}

impl AnalysisConfig {
    /// Validate threshold values, returning an error rather than clamping.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(Error::Config(format!(
                "analysis.min_confidence must be in [0.0, 1.0], got {}",
                self.min_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.semantic_threshold) {
            return Err(Error::Config(format!(
                "analysis.semantic_threshold must be in [0.0, 1.0], got {}",
                self.semantic_threshold
            )));
        }
        if self.analysis_period_days == 0 {
            return Err(Error::Config(
                "analysis.analysis_period_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_min_confidence() -> f64 {
    0.80
}

fn default_min_triggers() -> usize {
    2
}

fn default_analysis_period_days() -> u32 {
    7
}

fn default_semantic_enabled() -> bool {
    true
}

fn default_semantic_threshold() -> f64 {
    0.4
}

fn default_max_sessions() -> usize {
    20
}

fn default_max_findings() -> usize {
    10
}

/// Override paths for discovery and session ingestion
#[derive(Debug, Deserialize, Default)]
pub struct PathOverrides {
    /// Override for the user-level assistant directory (default ~/.claude)
    pub assistant_home: Option<PathBuf>,
    /// Override for the plugin cache directory
    pub plugin_cache: Option<PathBuf>,
}

impl PathOverrides {
    /// User-level assistant directory (`~/.claude` unless overridden).
    pub fn assistant_home(&self) -> PathBuf {
        self.assistant_home
            .clone()
            .unwrap_or_else(|| home_dir().join(".claude"))
    }

    /// Plugin cache directory (`~/.claude/plugins/cache` unless overridden).
    pub fn plugin_cache(&self) -> PathBuf {
        self.plugin_cache
            .clone()
            .unwrap_or_else(|| self.assistant_home().join("plugins").join("cache"))
    }

    /// Session log root (`~/.claude/projects`).
    pub fn projects_dir(&self) -> PathBuf {
        self.assistant_home().join("projects")
    }

    /// Assistant settings file (`~/.claude/settings.json`).
    pub fn settings_path(&self) -> PathBuf {
        self.assistant_home().join("settings.json")
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.analysis.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/skillscope/config.toml` (~/.config/skillscope/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("skillscope").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/skillscope/` (~/.local/state/skillscope/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("skillscope")
    }

    /// Returns the log file path
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("skillscope.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.min_confidence, 0.80);
        assert_eq!(config.analysis.min_triggers, 2);
        assert_eq!(config.analysis.analysis_period_days, 7);
        assert!(config.analysis.semantic_enabled);
        assert_eq!(config.analysis.semantic_threshold, 0.4);
        assert!(config.analysis.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[analysis]
min_confidence = 0.6
min_triggers = 1
analysis_period_days = 30
semantic_enabled = false

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.analysis.min_confidence, 0.6);
        assert_eq!(config.analysis.min_triggers, 1);
        assert_eq!(config.analysis.analysis_period_days, 30);
        assert!(!config.analysis.semantic_enabled);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validate_rejects_out_of_range_confidence() {
        let config = AnalysisConfig {
            min_confidence: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            min_confidence: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_semantic_threshold() {
        let config = AnalysisConfig {
            semantic_threshold: 2.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_path_overrides() {
        let paths = PathOverrides {
            assistant_home: Some(PathBuf::from("/tmp/assistant")),
            plugin_cache: None,
        };
        assert_eq!(paths.projects_dir(), PathBuf::from("/tmp/assistant/projects"));
        assert_eq!(
            paths.plugin_cache(),
            PathBuf::from("/tmp/assistant/plugins/cache")
        );
        assert_eq!(
            paths.settings_path(),
            PathBuf::from("/tmp/assistant/settings.json")
        );
    }
}
