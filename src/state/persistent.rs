use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;

use crate::state::state::GameInstall;

pub const DEV_MODE_KEY: &str = "dev_mode";
pub const GAME_INSTALL_KEY: &str = "game-install";

/// Key-value settings that survive restarts.
/// Writes stay in memory until [SettingsStore::save] flushes them to disk.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn set(&self, key: &str, value: Value) -> anyhow::Result<()>;
    async fn save(&self) -> anyhow::Result<()>;
    fn get(&self, key: &str) -> Option<Value>;
}

/// The `game-install` entry is stored wrapped in a `value` field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameInstallEntry {
    pub value: GameInstall,
}

pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl JsonFileStore {
    /// Missing or unreadable files load as an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default();

        JsonFileStore { path, entries: Mutex::new(entries) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Value>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    async fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        self.entries().insert(key.to_string(), value);
        Ok(())
    }

    async fn save(&self) -> anyhow::Result<()> {
        let to_save = serde_json::to_string_pretty(&*self.entries())?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, to_save).await?;

        Ok(())
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.entries().get(key).cloned()
    }
}

/// What the settings file remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSettings {
    pub developer_mode: Option<bool>,
    pub game_install: Option<GameInstall>,
}

impl PersistedSettings {
    pub fn read(store: &dyn SettingsStore) -> Self {
        let developer_mode = store.get(DEV_MODE_KEY).and_then(|value| match value.as_bool() {
            Some(flag) => Some(flag),
            None => {
                tracing::warn!("Ignoring malformed {} entry: {}", DEV_MODE_KEY, value);
                None
            }
        });

        let game_install = store.get(GAME_INSTALL_KEY).and_then(|value| {
            match serde_json::from_value::<GameInstallEntry>(value) {
                Ok(entry) => Some(entry.value),
                Err(e) => {
                    tracing::warn!("Ignoring malformed {} entry: {}", GAME_INSTALL_KEY, e);
                    None
                }
            }
        });

        PersistedSettings { developer_mode, game_install }
    }
}
