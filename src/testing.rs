use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use crate::{
    launcher::{
        backend::{Backend, BackendError},
        dialogs::{DirectoryPicker, DirectorySelection, Notifier},
    },
    state::{persistent::SettingsStore, state::GameInstall},
};

/// Backend that records every call. With a gate set, each call waits for one `notify_one`.
#[derive(Default)]
pub struct MockBackend {
    pub valid: bool,
    pub rejection: Option<String>,
    pub yacc_installed: bool,
    pub detected: Option<GameInstall>,
    pub gate: Option<Arc<Notify>>,
    pub verify_calls: Mutex<Vec<String>>,
    pub install_calls: Mutex<Vec<String>>,
    pub launch_calls: Mutex<Vec<(GameInstall, bool)>>,
    pub detect_calls: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepting_paths(mut self) -> Self {
        self.valid = true;
        self
    }

    pub fn rejecting(mut self, message: &str) -> Self {
        self.rejection = Some(message.to_string());
        self
    }

    pub fn with_yacc_installed(mut self) -> Self {
        self.yacc_installed = true;
        self
    }

    pub fn detecting(mut self, install: GameInstall) -> Self {
        self.detected = Some(install);
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn verify_count(&self) -> usize {
        self.verify_calls.lock().unwrap().len()
    }

    pub fn install_count(&self) -> usize {
        self.install_calls.lock().unwrap().len()
    }

    pub fn launch_count(&self) -> usize {
        self.launch_calls.lock().unwrap().len()
    }

    pub fn detect_count(&self) -> usize {
        self.detect_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.verify_count() + self.install_count() + self.launch_count()
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }

    fn outcome(&self, message: &str) -> Result<String, BackendError> {
        match &self.rejection {
            Some(rejection) => Err(BackendError::Rejected(rejection.clone())),
            None => Ok(message.to_string()),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn verify_install_location(&self, game_path: &str) -> Result<bool, BackendError> {
        self.verify_calls.lock().unwrap().push(game_path.to_string());
        self.pass_gate().await;
        Ok(self.valid)
    }

    async fn is_yacc_installed(&self, _game_path: &str) -> Result<bool, BackendError> {
        Ok(self.yacc_installed)
    }

    async fn find_game_install_location(&self) -> Result<GameInstall, BackendError> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);
        self.detected
            .clone()
            .ok_or_else(|| BackendError::Rejected("Could not auto-detect game install location!".to_string()))
    }

    async fn install_yacc_caller(&self, game_path: &str) -> Result<String, BackendError> {
        self.install_calls.lock().unwrap().push(game_path.to_string());
        self.pass_gate().await;
        self.outcome("Installed")
    }

    async fn launch_yacc(&self, game_install: &GameInstall, bypass_checks: bool) -> Result<String, BackendError> {
        self.launch_calls.lock().unwrap().push((game_install.clone(), bypass_checks));
        self.pass_gate().await;
        self.outcome("Launched game")
    }
}

#[derive(Default)]
pub struct RecordingSettingsStore {
    pub writes: Mutex<Vec<(String, Value)>>,
    pub saves: AtomicUsize,
    pub fail_saves: bool,
    values: Mutex<BTreeMap<String, Value>>,
}

impl RecordingSettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn with_entry(self, key: &str, value: Value) -> Self {
        self.values.lock().unwrap().insert(key.to_string(), value);
        self
    }

    pub fn writes(&self) -> Vec<(String, Value)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsStore for RecordingSettingsStore {
    async fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        self.writes.lock().unwrap().push((key.to_string(), value.clone()));
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn save(&self) -> anyhow::Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            anyhow::bail!("disk is full");
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

pub struct ScriptedPicker {
    pub selection: DirectorySelection,
    pub default_dirs: Mutex<Vec<PathBuf>>,
}

impl ScriptedPicker {
    pub fn new(selection: DirectorySelection) -> Self {
        ScriptedPicker { selection, default_dirs: Mutex::new(Vec::new()) }
    }

    pub fn single(path: &str) -> Self {
        Self::new(DirectorySelection::Single(PathBuf::from(path)))
    }

    pub fn prompt_count(&self) -> usize {
        self.default_dirs.lock().unwrap().len()
    }
}

#[async_trait]
impl DirectoryPicker for ScriptedPicker {
    async fn pick_directory(&self, default_dir: &Path) -> DirectorySelection {
        self.default_dirs.lock().unwrap().push(default_dir.to_path_buf());
        self.selection.clone()
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}
