use serde::{Deserialize, Serialize};

/// How the game was installed. `UNKNOWN` is used when the location was picked by hand.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum InstallType {
    STEAM,
    UNKNOWN,
}

/// Drives what the play button does.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum YaccState {
    #[default]
    GameNotFound,
    ReadyToPlay,
    Install,
    Installing,
    MustUpdate,
    Updating,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameInstall {
    pub game_path: String,
    pub install_type: InstallType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YaccLauncherStore {
    pub developer_mode: bool,
    pub game_path: Option<String>,
    /// Only meaningful once `game_path` is set.
    pub install_type: Option<InstallType>,

    pub launcher_version: String,

    pub installed_yacc_version: String,
    pub yacc_state: YaccState,

    pub yacc_is_running: bool,

    /// `-1` until the backend reports statistics.
    pub player_count: i32,
    pub server_count: i32,
}

impl Default for YaccLauncherStore {
    fn default() -> Self {
        YaccLauncherStore {
            developer_mode: false,
            game_path: None,
            install_type: None,
            launcher_version: launcher_version(),
            installed_yacc_version: String::new(),
            yacc_state: YaccState::GameNotFound,
            yacc_is_running: false,
            player_count: -1,
            server_count: -1,
        }
    }
}

impl YaccLauncherStore {
    /// Descriptor handed to the backend. Falls back to an empty path and `UNKNOWN` when nothing was chosen yet.
    pub fn game_install(&self) -> GameInstall {
        GameInstall {
            game_path: self.game_path.clone().unwrap_or_default(),
            install_type: self.install_type.unwrap_or(InstallType::UNKNOWN),
        }
    }
}

pub fn launcher_version() -> String {
    let version = env!("CARGO_PKG_VERSION");
    if cfg!(debug_assertions) { format!("v{} (debug mode)", version) } else { format!("v{}", version) }
}
