use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    /// Empty means `<data_dir>/receipts`.
    #[serde(default)]
    pub receipts_dir: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_maintenance_fee")]
    pub maintenance_fee: f64,
}

fn default_title() -> String {
    "Apartment Management System".to_string()
}

fn default_currency_symbol() -> String {
    "Rs.".to_string()
}

fn default_maintenance_fee() -> f64 {
    4000.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            receipts_dir: String::new(),
            title: default_title(),
            currency_symbol: default_currency_symbol(),
            maintenance_fee: default_maintenance_fee(),
        }
    }
}

impl Settings {
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn receipts_path(&self) -> PathBuf {
        if self.receipts_dir.is_empty() {
            self.data_path().join("receipts")
        } else {
            PathBuf::from(&self.receipts_dir)
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("aptkeeper")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("aptkeeper")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(path).unwrap_or_default();
    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "unreadable settings, using defaults");
        Settings::default()
    })
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/apts".to_string(),
            receipts_dir: "/tmp/apts/pdf".to_string(),
            title: "Lotus Residency".to_string(),
            currency_symbol: "$".to_string(),
            maintenance_fee: 3500.0,
        };
        save_settings_to(&settings, &path).unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.title, "Lotus Residency");
        assert_eq!(loaded.receipts_path(), PathBuf::from("/tmp/apts/pdf"));
        assert_eq!(loaded.maintenance_fee, 3500.0);
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("absent.json"));
        assert_eq!(s.currency_symbol, "Rs.");
        assert_eq!(s.maintenance_fee, 4000.0);
        assert!(!s.data_dir.is_empty());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/apts"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.title, "Apartment Management System");
        assert_eq!(s.receipts_path(), PathBuf::from("/tmp/apts/receipts"));
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        let s = load_settings_from(&path);
        assert_eq!(s.title, "Apartment Management System");
    }
}
