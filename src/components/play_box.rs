use std::sync::Arc;

use dioxus::prelude::*;

use crate::{
    components::launcher_button::{LauncherButton, LauncherButtonStyle},
    state::{
        state::{YaccLauncherStore, YaccState},
        store::LauncherStore,
    },
};

pub fn play_label(state: YaccState) -> &'static str {
    match state {
        YaccState::GameNotFound => "Game not found",
        YaccState::ReadyToPlay => "Play",
        YaccState::Install => "Install",
        YaccState::Installing => "Installing...",
        YaccState::MustUpdate => "Update",
        YaccState::Updating => "Updating...",
    }
}

fn launch(store: Arc<LauncherStore>, bypass_checks: bool) {
    spawn(async move {
        if let Err(e) = store.launch_game(bypass_checks).await {
            tracing::warn!("Couldn't launch: {}", e);
        }
    });
}

#[component]
pub fn PlayBox() -> Element {
    let store = use_context::<Arc<LauncherStore>>();
    let snapshot = use_context::<Signal<YaccLauncherStore>>();
    let yacc_state = snapshot.read().yacc_state;
    let developer_mode = snapshot.read().developer_mode;
    let in_flight = matches!(yacc_state, YaccState::Installing | YaccState::Updating);

    let play_store = store.clone();
    let bypass_store = store.clone();

    rsx! {
        div {
            class: "flex flex-row gap-4 justify-center items-center",
            LauncherButton {
                text: play_label(yacc_state).to_string(),
                style: LauncherButtonStyle::Safe,
                disabled: in_flight,
                onclick: move |_| launch(play_store.clone(), false),
            }
            if developer_mode {
                LauncherButton {
                    text: "Launch without checks".to_string(),
                    style: LauncherButtonStyle::Warning,
                    disabled: false,
                    onclick: move |_| launch(bypass_store.clone(), true),
                }
            }
        }
    }
}
