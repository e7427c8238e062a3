use std::sync::{Arc, Mutex};

use dioxus::prelude::*;
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::{
    components::{play_box::PlayBox, settings_box::SettingsBox, status_bar::StatusBar},
    launcher::{backend::BackendEvent, heartbeat::Heartbeat},
    state::{state::YaccLauncherStore, store::LauncherStore},
};

struct BackendTasks {
    receiver: mpsc::UnboundedReceiver<BackendEvent>,
    heartbeat: Heartbeat,
}

/// Backend event channel and the heartbeat feeding it, started by the first [App] render.
#[derive(Clone)]
pub struct BackendEvents(Arc<Mutex<Option<BackendTasks>>>);

impl BackendEvents {
    pub fn new(receiver: mpsc::UnboundedReceiver<BackendEvent>, heartbeat: Heartbeat) -> Self {
        BackendEvents(Arc::new(Mutex::new(Some(BackendTasks { receiver, heartbeat }))))
    }

    fn take(&self) -> Option<BackendTasks> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).take()
    }
}

#[component]
pub fn App() -> Element {
    let store = use_context::<Arc<LauncherStore>>();
    let events = use_context::<BackendEvents>();
    let mut snapshot = use_context_provider(|| Signal::new(store.snapshot()));

    let startup_store = store.clone();
    use_hook(move || {
        let Some(BackendTasks { receiver, heartbeat }) = events.take() else {
            return;
        };

        spawn(async move {
            if let Err(e) = startup_store.hydrate().await {
                tracing::error!("Failed restoring launcher settings: {}", e);
            }
            tokio::spawn(heartbeat.run());
            startup_store.pump_backend_events(receiver).await;
        });
    });

    use_future(move || {
        let store = store.clone();
        async move {
            let mut updates = std::pin::pin!(store.subscribe());
            while let Some(next) = updates.next().await {
                snapshot.set(next);
            }
        }
    });

    rsx! {
        div {
            class: "w-screen h-screen flex flex-col items-center justify-between bg-black text-white",
            h1 { class: "text-4xl font-bold pt-8", "YACC Launcher" }
            SettingsBox {}
            PlayBox {}
            StatusBar {}
        }
    }
}
