use std::sync::Arc;

use dioxus::prelude::*;

use crate::{
    components::launcher_button::{LauncherButton, LauncherButtonStyle},
    state::{state::YaccLauncherStore, store::LauncherStore},
};

#[component]
pub fn SettingsBox() -> Element {
    let store = use_context::<Arc<LauncherStore>>();
    let snapshot = use_context::<Signal<YaccLauncherStore>>();
    let game_path = snapshot.read().game_path.clone().unwrap_or("None!".to_string());
    let developer_mode = snapshot.read().developer_mode;

    let path_store = store.clone();
    let dev_store = store.clone();

    rsx! {
        div {
            class: "w-3/4 outline-solid p-4 rounded-lg flex flex-col gap-3",
            h1 { class: "text-2xl text-center font-semibold", "Settings" }
            p { "Game folder: {game_path}" }
            LauncherButton {
                text: "Change game folder".to_string(),
                style: LauncherButtonStyle::Safe,
                disabled: false,
                onclick: move |_| {
                    let store = path_store.clone();
                    spawn(async move {
                        if let Err(e) = store.update_game_path().await {
                            tracing::error!("Couldn't update the game folder: {}", e);
                        }
                    });
                },
            }
            label {
                input {
                    class: "mr-4",
                    r#type: "checkbox",
                    checked: developer_mode,
                    onchange: move |_| {
                        let store = dev_store.clone();
                        spawn(async move {
                            if let Err(e) = store.toggle_dev_mode().await {
                                tracing::error!("Couldn't save developer mode: {}", e);
                            }
                        });
                    },
                },
                "Developer mode"
            }
        }
    }
}
