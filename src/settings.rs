use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::google::DEFAULT_ENDPOINT;

const SETTINGS_DIR: &str = "speechform";
const SETTINGS_FILENAME: &str = "settings.json";

/// Optional startup preferences. Read once, never written back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(deserialize_with = "deserialize_optional")]
    pub default_language: Option<String>,
    #[serde(deserialize_with = "deserialize_optional")]
    pub default_voice: Option<String>,
    pub endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_language: None,
            default_voice: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::de::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

pub fn load_settings() -> Settings {
    match load_settings_from_path(&default_settings_path()) {
        Ok(settings) => settings,
        Err(err) => {
            log::warn!("Using default settings: {err:#}");
            Settings::default()
        }
    }
}

pub fn load_settings_from_path(path: &Path) -> Result<Settings> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            let parsed: Settings = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?;
            Ok(fill_defaults(parsed))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(err) => Err(err).with_context(|| format!("Failed reading {}", path.display())),
    }
}

pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_DIR)
        .join(SETTINGS_FILENAME)
}

fn fill_defaults(mut settings: Settings) -> Settings {
    if settings.endpoint.trim().is_empty() {
        settings.endpoint = DEFAULT_ENDPOINT.to_string();
    } else {
        settings.endpoint = settings.endpoint.trim().to_string();
    }
    settings
}
