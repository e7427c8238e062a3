use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::state::state::GameInstall;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Opaque rejection message from the backend.
    #[error("{0}")]
    Rejected(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Native side of the launcher.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn verify_install_location(&self, game_path: &str) -> Result<bool, BackendError>;

    /// Whether the YACC executable is present in the game folder.
    async fn is_yacc_installed(&self, game_path: &str) -> Result<bool, BackendError>;

    async fn find_game_install_location(&self) -> Result<GameInstall, BackendError>;

    /// Also used for updates, which reinstall over the existing files.
    async fn install_yacc_caller(&self, game_path: &str) -> Result<String, BackendError>;

    async fn launch_yacc(&self, game_install: &GameInstall, bypass_checks: bool) -> Result<String, BackendError>;
}

/// Notifications the backend pushes without being asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    Ping,
    YaccRunning(bool),
}

#[derive(Debug, Clone)]
pub struct EventSender(mpsc::UnboundedSender<BackendEvent>);

impl EventSender {
    pub fn new(sender: mpsc::UnboundedSender<BackendEvent>) -> Self {
        EventSender(sender)
    }

    /// `false` once the receiving side is gone.
    pub fn send(&self, event: BackendEvent) -> bool {
        if self.0.send(event).is_err() {
            tracing::debug!("Nobody is listening for backend events anymore");
            return false;
        }
        true
    }
}
