#![windows_subsystem = "windows"]

use std::sync::Arc;

use anyhow::Context;

use crate::{
    app::BackendEvents,
    launcher::{
        dialogs::{RfdDirectoryPicker, RfdNotifier},
        directories,
        heartbeat::PING_INTERVAL,
        local::LocalBackend,
    },
    state::{
        persistent::JsonFileStore,
        store::{Collaborators, LauncherStore},
    },
};

mod app;
mod components;
mod launcher;
mod state;
#[cfg(test)]
mod testing;

fn main() -> anyhow::Result<()> {
    launcher::logging::init();

    std::fs::create_dir_all(directories::get_data_dir()).context("failed creating the launcher data directory")?;

    let settings = Arc::new(JsonFileStore::load(directories::get_settings_file()));
    tracing::info!("Using settings file {}", settings.path().display());

    let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
    let backend = Arc::new(LocalBackend::new(directories::get_release_archive(), events_tx));
    let heartbeat = backend.heartbeat(PING_INTERVAL);
    let store = Arc::new(LauncherStore::new(Collaborators {
        backend,
        settings,
        picker: Arc::new(RfdDirectoryPicker),
        notifier: Arc::new(RfdNotifier),
        default_dir: directories::get_data_dir().to_path_buf(),
    }));

    tracing::info!("Starting YACC launcher {}", store.snapshot().launcher_version);
    dioxus::LaunchBuilder::new().with_context(store).with_context(BackendEvents::new(events_rx, heartbeat)).launch(app::App);

    tracing::info!("Until next time!");
    Ok(())
}
