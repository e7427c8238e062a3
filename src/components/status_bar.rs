use dioxus::prelude::*;

use crate::state::state::YaccLauncherStore;

/// Counters are `-1` until the backend reports them.
pub fn format_count(count: i32) -> String {
    if count < 0 { "-".to_string() } else { count.to_string() }
}

#[component]
pub fn StatusBar() -> Element {
    let snapshot = use_context::<Signal<YaccLauncherStore>>();
    let state = snapshot.read();
    let running = if state.yacc_is_running { "YACC is running" } else { "YACC is not running" };
    let installed =
        if state.installed_yacc_version.is_empty() { "unknown".to_string() } else { state.installed_yacc_version.clone() };
    let launcher_version = state.launcher_version.clone();
    let players = format_count(state.player_count);
    let servers = format_count(state.server_count);

    rsx! {
        div {
            class: "w-full flex flex-row justify-between px-4 py-2 text-sm opacity-75",
            p { "Launcher {launcher_version}" }
            p { "YACC {installed}" }
            p { "{players} players on {servers} servers" }
            p { "{running}" }
        }
    }
}
