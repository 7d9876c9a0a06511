use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StashLogError};
use crate::reconciler::DEFAULT_MOVEMENT_WINDOW_MINUTES;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Timezone {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_window")]
    pub movement_window_minutes: f64,
    #[serde(default)]
    pub timezone: Timezone,
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_window() -> f64 {
    DEFAULT_MOVEMENT_WINDOW_MINUTES
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            movement_window_minutes: default_window(),
            timezone: Timezone::default(),
            output_format: OutputFormat::default(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("stashlog")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Load settings, falling back to defaults when the file is missing or
/// unreadable.
pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| StashLogError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_serde_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            movement_window_minutes: 2.5,
            timezone: Timezone::Utc,
            output_format: OutputFormat::Csv,
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.movement_window_minutes, 2.5);
        assert_eq!(loaded.timezone, Timezone::Utc);
        assert_eq!(loaded.output_format, OutputFormat::Csv);
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.movement_window_minutes, 10.0);
        assert_eq!(s.timezone, Timezone::Local);
        assert_eq!(s.output_format, OutputFormat::Table);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"timezone": "utc"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.movement_window_minutes, 10.0);
        assert_eq!(s.timezone, Timezone::Utc);
        assert_eq!(s.output_format, OutputFormat::Table);
    }

    #[test]
    fn test_rejects_unknown_timezone() {
        let json = r#"{"timezone": "mars"}"#;
        assert!(serde_json::from_str::<Settings>(json).is_err());
    }
}
