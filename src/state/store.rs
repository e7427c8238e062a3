use std::{path::PathBuf, sync::Arc};

use futures::Stream;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::{
    launcher::{
        backend::{Backend, BackendError, BackendEvent},
        dialogs::{DirectoryPicker, DirectorySelection, Notifier},
    },
    state::{
        machine::LaunchAction,
        persistent::{DEV_MODE_KEY, GAME_INSTALL_KEY, GameInstallEntry, PersistedSettings, SettingsStore},
        single_flight::{FlightGuard, SingleFlight},
        state::{GameInstall, InstallType, YaccLauncherStore, YaccState},
    },
};

const TOGGLE_DEV_MODE: &str = "toggle_dev_mode";
const UPDATE_GAME_PATH: &str = "update_game_path";
const LAUNCH_GAME: &str = "launch_game";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} is already running")]
    Busy(&'static str),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("failed persisting settings: {0}")]
    Persistence(String),
}

/// Everything the store talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub backend: Arc<dyn Backend>,
    pub settings: Arc<dyn SettingsStore>,
    pub picker: Arc<dyn DirectoryPicker>,
    pub notifier: Arc<dyn Notifier>,
    /// Where the directory picker starts.
    pub default_dir: PathBuf,
}

/// Reactive container around [YaccLauncherStore].
///
/// Every mutation replaces the published snapshot as a whole, subscribers see it through [LauncherStore::subscribe].
/// Each operation is single-flight: calling it again while it is still running returns [StoreError::Busy].
pub struct LauncherStore {
    state: watch::Sender<YaccLauncherStore>,
    collaborators: Collaborators,
    flights: SingleFlight,
}

impl LauncherStore {
    pub fn new(collaborators: Collaborators) -> Self {
        LauncherStore {
            state: watch::Sender::new(YaccLauncherStore::default()),
            collaborators,
            flights: SingleFlight::new(),
        }
    }

    pub fn snapshot(&self) -> YaccLauncherStore {
        self.state.borrow().clone()
    }

    /// Yields the current snapshot, then one per published change. Ends when the store is dropped.
    /// A slow subscriber only sees the latest of several quick changes.
    pub fn subscribe(&self) -> impl Stream<Item = YaccLauncherStore> + Send + 'static {
        let mut receiver = self.state.subscribe();
        receiver.mark_changed();

        futures::stream::unfold(receiver, |mut receiver| async move {
            receiver.changed().await.ok()?;
            let snapshot = receiver.borrow_and_update().clone();
            Some((snapshot, receiver))
        })
    }

    pub fn update(&self, mutate: impl FnOnce(&mut YaccLauncherStore)) {
        self.state.send_modify(mutate);
    }

    /// Restores whatever the settings file remembered from the last run.
    ///
    /// Without a remembered install the backend is asked to find one, which is then saved like a chosen path.
    /// A known install starts in [YaccState::ReadyToPlay] when YACC is already there, otherwise in [YaccState::Install].
    pub async fn hydrate(&self) -> Result<(), StoreError> {
        let persisted = PersistedSettings::read(self.collaborators.settings.as_ref());
        tracing::info!("Restored launcher settings: {:?}", persisted);

        let game_install = match persisted.game_install {
            Some(install) => Some(install),
            None => self.detect_game_install().await?,
        };

        let yacc_state = match &game_install {
            Some(install) => match self.collaborators.backend.is_yacc_installed(&install.game_path).await {
                Ok(true) => YaccState::ReadyToPlay,
                Ok(false) => YaccState::Install,
                Err(e) => {
                    tracing::warn!("Couldn't check for YACC in {}: {}", install.game_path, e);
                    YaccState::Install
                }
            },
            None => YaccState::GameNotFound,
        };

        self.update(|state| {
            if let Some(developer_mode) = persisted.developer_mode {
                state.developer_mode = developer_mode;
            }
            if let Some(install) = &game_install {
                state.game_path = Some(install.game_path.clone());
                state.install_type = Some(install.install_type);
            }
            state.yacc_state = yacc_state;
        });

        tracing::info!("Starting in {:?}", yacc_state);
        Ok(())
    }

    async fn detect_game_install(&self) -> Result<Option<GameInstall>, StoreError> {
        let install = match self.collaborators.backend.find_game_install_location().await {
            Ok(install) => install,
            Err(e) => {
                tracing::info!("{}", e);
                return Ok(None);
            }
        };

        tracing::info!("Found COD4 install at {}", install.game_path);
        self.persist_game_install(install.clone()).await?;
        Ok(Some(install))
    }

    pub async fn toggle_dev_mode(&self) -> Result<(), StoreError> {
        let _flight = self.begin(TOGGLE_DEV_MODE)?;

        let mut developer_mode = false;
        self.update(|state| {
            state.developer_mode = !state.developer_mode;
            developer_mode = state.developer_mode;
        });
        tracing::info!("Developer mode {}", if developer_mode { "enabled" } else { "disabled" });

        self.persist(DEV_MODE_KEY, Value::Bool(developer_mode)).await
    }

    pub async fn update_game_path(&self) -> Result<(), StoreError> {
        let _flight = self.begin(UPDATE_GAME_PATH)?;
        let collaborators = &self.collaborators;

        let selected = match collaborators.picker.pick_directory(&collaborators.default_dir).await {
            DirectorySelection::Single(path) => path.to_string_lossy().into_owned(),
            DirectorySelection::Multiple(paths) => {
                tracing::warn!("{} directories selected, expected one", paths.len());
                collaborators.notifier.alert("Please only select a single directory").await;
                return Ok(());
            }
            DirectorySelection::Cancelled => {
                tracing::debug!("Directory selection cancelled");
                return Ok(());
            }
        };

        if !collaborators.backend.verify_install_location(&selected).await? {
            tracing::error!("Not a valid COD4 install location: {}", selected);
            return Ok(());
        }

        self.update(|state| {
            state.game_path = Some(selected.clone());
            state.install_type = Some(InstallType::STEAM);
            state.yacc_state = YaccState::ReadyToPlay;
        });

        self.persist_game_install(GameInstall { game_path: selected.clone(), install_type: InstallType::STEAM }).await?;

        tracing::info!("Game path set to {}", selected);
        Ok(())
    }

    /// Installs, updates or launches depending on the current [YaccState].
    /// With `bypass_checks` the game is launched no matter the state.
    ///
    /// Backend failures are reported to the user, not returned. Installing/updating states are never
    /// rolled back or advanced here.
    pub async fn launch_game(&self, bypass_checks: bool) -> Result<(), StoreError> {
        let _flight = self.begin(LAUNCH_GAME)?;
        let backend = &self.collaborators.backend;
        let current = self.snapshot();
        let game_install = current.game_install();

        if bypass_checks {
            match backend.launch_yacc(&game_install, true).await {
                Ok(message) => tracing::info!("Launched with bypassed checks: {}", message),
                Err(e) => self.report(&e, true).await,
            }
            return Ok(());
        }

        let action = LaunchAction::for_state(current.yacc_state);
        match action {
            LaunchAction::Install | LaunchAction::Update => {
                let install = backend.install_yacc_caller(&game_install.game_path);
                if let Some(pending) = action.pending_state() {
                    self.update(|state| state.yacc_state = pending);
                }

                match install.await {
                    Ok(message) => tracing::info!("{}", message),
                    Err(e) => self.report(&e, true).await,
                }
            }
            LaunchAction::Launch => match backend.launch_yacc(&game_install, false).await {
                Ok(message) => tracing::info!("{}", message),
                Err(e) => self.report(&e, false).await,
            },
            LaunchAction::Nothing => match current.yacc_state {
                YaccState::GameNotFound => tracing::info!("Game not found!"),
                state => tracing::info!("Nothing to launch while {:?}", state),
            },
        }

        Ok(())
    }

    pub fn apply_backend_event(&self, event: BackendEvent) {
        match event {
            BackendEvent::Ping => tracing::trace!("Backend ping"),
            BackendEvent::YaccRunning(running) => {
                self.state.send_if_modified(|state| {
                    let changed = state.yacc_is_running != running;
                    state.yacc_is_running = running;
                    changed
                });
            }
        }
    }

    /// Applies backend events until every sender is gone.
    pub async fn pump_backend_events(&self, mut events: mpsc::UnboundedReceiver<BackendEvent>) {
        while let Some(event) = events.recv().await {
            self.apply_backend_event(event);
        }
        tracing::debug!("Backend event channel closed");
    }

    fn begin(&self, operation: &'static str) -> Result<FlightGuard, StoreError> {
        self.flights.try_begin(operation).ok_or_else(|| {
            tracing::warn!("Ignoring {}: already running", operation);
            StoreError::Busy(operation)
        })
    }

    async fn persist(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let settings = &self.collaborators.settings;

        settings.set(key, value).await.map_err(|e| StoreError::Persistence(format!("{e:#}")))?;
        settings.save().await.map_err(|e| StoreError::Persistence(format!("{e:#}")))?;

        Ok(())
    }

    async fn persist_game_install(&self, install: GameInstall) -> Result<(), StoreError> {
        let entry = serde_json::to_value(GameInstallEntry { value: install })
            .map_err(|e| StoreError::Persistence(e.to_string()))?;
        self.persist(GAME_INSTALL_KEY, entry).await
    }

    async fn report(&self, error: &BackendError, alert: bool) {
        tracing::error!("{}", error);
        if alert {
            self.collaborators.notifier.alert(&error.to_string()).await;
        }
    }
}
