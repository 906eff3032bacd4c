use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use timer_core::{EngineConfig, Mode};

use crate::alerts::AlertConfig;
use crate::ui::Style;

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub style: Style,
    pub start_mode: Mode,
    pub engine: EngineConfig,
    pub alerts: AlertConfig,
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Self {
        let path = match ProjectDirs::from("", "", "lapwatch") {
            Some(pd) => pd.config_dir().join("settings.json"),
            None => PathBuf::from("lapwatch_settings.json"),
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable settings fall back to defaults.
    pub fn load(&self) -> Settings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    log::error!("Failed to read settings {}: {}", self.path.display(), e);
                }
                return Settings::default();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Ignoring corrupt settings {}: {}", self.path.display(), e);
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(settings)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use timer_core::{Granularity, ResetPolicy, StopwatchFormat};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::with_path(dir.path().join("none.json"));
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_save_and_load_custom_settings() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::with_path(dir.path().join("nested").join("settings.json"));
        let settings = Settings {
            style: Style::Plain,
            start_mode: Mode::Countdown,
            engine: EngineConfig {
                granularity: Granularity::Seconds,
                reset_policy: ResetPolicy::Clear,
                stopwatch_format: StopwatchFormat::PromoteHours,
            },
            alerts: AlertConfig {
                bell: false,
                notification: true,
            },
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(SettingsStore::with_path(&path).load(), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, br#"{ "style": "plain", "engine": { "granularity": "seconds" } }"#).unwrap();
        let settings = SettingsStore::with_path(&path).load();
        assert_eq!(settings.style, Style::Plain);
        assert_eq!(settings.engine.granularity, Granularity::Seconds);
        assert_eq!(settings.engine.reset_policy, ResetPolicy::RestoreConfigured);
        assert_eq!(settings.alerts, AlertConfig::default());
    }
}
