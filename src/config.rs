//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Environment variables
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub derive: DeriveConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Canvas geometry used by the editor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Radius of a state circle
    #[serde(default = "default_state_radius")]
    pub state_radius: f64,

    /// Height of the first self-loop above the state border
    #[serde(default = "default_loop_height")]
    pub loop_height: f64,

    /// Extra height for each further self-loop on the same state
    #[serde(default = "default_spacing")]
    pub loop_spacing: f64,

    /// Distance between a self-loop and its label
    #[serde(default = "default_loop_label_gap")]
    pub loop_label_gap: f64,

    /// Distance between successive arcs joining the same pair of states
    #[serde(default = "default_spacing")]
    pub edge_spacing: f64,

    /// Distance between an arc and its label, toward the base line
    #[serde(default = "default_edge_label_gap")]
    pub edge_label_gap: f64,

    /// Length of the arrow marking the initial state
    #[serde(default = "default_initial_arrow")]
    pub initial_arrow: f64,

    /// Inset of the inner ring drawn on final states
    #[serde(default = "default_final_ring_inset")]
    pub final_ring_inset: f64,

    /// Canvas size in canvas units
    #[serde(default = "default_canvas_width")]
    pub canvas_width: f64,

    #[serde(default = "default_canvas_height")]
    pub canvas_height: f64,
}

/// Regular expression derivation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveConfig {
    /// Order in which state variables are eliminated
    #[serde(default)]
    pub order: EliminationOrder,

    /// Glyph for the empty word
    #[serde(default = "default_epsilon")]
    pub epsilon: String,

    /// Glyph for the empty language
    #[serde(default = "default_empty")]
    pub empty: String,
}

/// Strategy for picking the next variable to eliminate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EliminationOrder {
    /// Intermediate states first, cheapest substitution first
    #[default]
    Heuristic,
    /// Non-initial states by state number
    Sequential,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

// Default value functions

fn default_state_radius() -> f64 {
    25.0
}

fn default_loop_height() -> f64 {
    25.0
}

fn default_spacing() -> f64 {
    25.0
}

fn default_loop_label_gap() -> f64 {
    8.0
}

fn default_edge_label_gap() -> f64 {
    10.0
}

fn default_initial_arrow() -> f64 {
    30.0
}

fn default_final_ring_inset() -> f64 {
    4.0
}

fn default_canvas_width() -> f64 {
    700.0
}

fn default_canvas_height() -> f64 {
    500.0
}

fn default_epsilon() -> String {
    "λ".to_string()
}

fn default_empty() -> String {
    "∅".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            state_radius: default_state_radius(),
            loop_height: default_loop_height(),
            loop_spacing: default_spacing(),
            loop_label_gap: default_loop_label_gap(),
            edge_spacing: default_spacing(),
            edge_label_gap: default_edge_label_gap(),
            initial_arrow: default_initial_arrow(),
            final_ring_inset: default_final_ring_inset(),
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
        }
    }
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            order: EliminationOrder::default(),
            epsilon: default_epsilon(),
            empty: default_empty(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./config.toml
    /// 2. ~/.automata-re/config.toml
    /// 3. /etc/automata-re/config.toml
    pub fn load() -> Result<Self> {
        let mut paths = vec![PathBuf::from("config.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".automata-re").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/automata-re/config.toml"));

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.editor.state_radius, 25.0);
        assert_eq!(config.editor.loop_spacing, 25.0);
        assert_eq!(config.derive.order, EliminationOrder::Heuristic);
        assert_eq!(config.derive.epsilon, "λ");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[editor]
state_radius = 30.0

[derive]
order = "sequential"
epsilon = "ε"

[logging]
level = "debug"
file = "/tmp/automata-re.log"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.editor.state_radius, 30.0);
        // untouched fields keep their defaults
        assert_eq!(config.editor.edge_label_gap, 10.0);
        assert_eq!(config.derive.order, EliminationOrder::Sequential);
        assert_eq!(config.derive.epsilon, "ε");
        assert_eq!(config.derive.empty, "∅");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.logging.file,
            Some(PathBuf::from("/tmp/automata-re.log"))
        );
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::from_file("/nonexistent/automata-re.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
