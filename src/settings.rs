use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard},
    time::Duration,
};

use crate::{i18n::Language, timer::DEFAULT_TABLE_COUNT};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FloorSettings {
    /// Tables created on a fresh floor. Ignored once tables are stored.
    pub table_count: usize,
    pub tick_interval_ms: u64,
    pub default_language: Language,
    /// Where CSV reports go; `<data dir>/exports` when unset.
    pub export_dir: Option<PathBuf>,
    /// Credit the time the program was not running to tables left running.
    pub accrue_downtime: bool,
}

impl Default for FloorSettings {
    fn default() -> Self {
        Self {
            table_count: DEFAULT_TABLE_COUNT,
            tick_interval_ms: 1000,
            default_language: Language::default(),
            export_dir: None,
            accrue_downtime: true,
        }
    }
}

impl FloorSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(10))
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<FloorSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("Ignoring unreadable settings at {}: {err}", path.display());
                FloorSettings::default()
            })
        } else {
            FloorSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> FloorSettings {
        self.read().clone()
    }

    pub fn export_dir(&self, data_dir: &Path) -> PathBuf {
        self.read()
            .export_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("exports"))
    }

    #[cfg(test)]
    pub fn update(&self, settings: FloorSettings) -> Result<()> {
        let mut guard = self.write();
        *guard = settings;
        self.persist(&guard)
    }

    /// Writes the current settings out so operators have a file to edit.
    pub fn ensure_file(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        let guard = self.read();
        self.persist(&guard)
    }

    fn read(&self) -> RwLockReadGuard<'_, FloorSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[cfg(test)]
    fn write(&self) -> std::sync::RwLockWriteGuard<'_, FloorSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn persist(&self, data: &FloorSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.settings(), FloorSettings::default());
        assert_eq!(store.export_dir(dir.path()), dir.path().join("exports"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "table_count": 6, "default_language": "zh" }"#).unwrap();

        let settings = SettingsStore::new(path).unwrap().settings();
        assert_eq!(settings.table_count, 6);
        assert_eq!(settings.default_language, Language::Chinese);
        assert_eq!(settings.tick_interval_ms, 1000);
        assert!(settings.accrue_downtime);
    }

    #[test]
    fn unreadable_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ table_count: ").unwrap();
        assert_eq!(SettingsStore::new(path).unwrap().settings(), FloorSettings::default());
    }

    #[test]
    fn update_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();
        store.ensure_file().unwrap();
        assert!(path.exists());

        let mut settings = store.settings();
        settings.export_dir = Some(dir.path().join("reports"));
        store.update(settings.clone()).unwrap();

        let reloaded = SettingsStore::new(path).unwrap();
        assert_eq!(reloaded.settings(), settings);
        assert_eq!(reloaded.export_dir(dir.path()), dir.path().join("reports"));
    }

    #[test]
    fn tick_interval_has_a_floor() {
        let settings = FloorSettings {
            tick_interval_ms: 0,
            ..FloorSettings::default()
        };
        assert_eq!(settings.tick_interval(), Duration::from_millis(10));
    }
}
