use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use steamlocate::SteamDir;
use tokio::{fs, process::Command, sync::mpsc};
use zip::ZipArchive;

use crate::{
    launcher::{
        backend::{Backend, BackendError, BackendEvent, EventSender},
        heartbeat::{Heartbeat, SystemProcessCheck},
    },
    state::state::{GameInstall, InstallType},
};

const GAME_EXECUTABLE: &str = "iw3mp.exe";
const YACC_EXECUTABLE: &str = "YACC.exe";
const COD4_STEAM_ID: u32 = 7940;
/// Only archive entries below this folder are installed.
const ARCHIVE_ROOT: &str = "YACC";

/// Backend that works directly on the local file system.
pub struct LocalBackend {
    release_archive: PathBuf,
    events: EventSender,
}

impl LocalBackend {
    pub fn new(release_archive: impl Into<PathBuf>, events: mpsc::UnboundedSender<BackendEvent>) -> Self {
        LocalBackend { release_archive: release_archive.into(), events: EventSender::new(events) }
    }

    /// Background task reporting on the system's YACC processes through this backend's event channel.
    pub fn heartbeat(&self, interval: Duration) -> Heartbeat {
        Heartbeat::new(self.events.clone(), Arc::new(SystemProcessCheck::new()), interval)
    }
}

#[async_trait]
impl Backend for LocalBackend {
    async fn verify_install_location(&self, game_path: &str) -> Result<bool, BackendError> {
        let executable = Path::new(game_path).join(GAME_EXECUTABLE);
        let is_valid = fs::try_exists(&executable).await.unwrap_or(false);
        tracing::info!("{} exists in path? {}", GAME_EXECUTABLE, is_valid);

        if !is_valid {
            tracing::warn!("Incorrect game path \"{}\"", game_path);
        }
        Ok(is_valid)
    }

    async fn is_yacc_installed(&self, game_path: &str) -> Result<bool, BackendError> {
        let executable = Path::new(game_path).join(YACC_EXECUTABLE);
        Ok(fs::try_exists(&executable).await.unwrap_or(false))
    }

    async fn find_game_install_location(&self) -> Result<GameInstall, BackendError> {
        let found = tokio::task::spawn_blocking(locate_steam_install)
            .await
            .map_err(|e| BackendError::Rejected(format!("Steam lookup failed: {e}")))?;

        found.ok_or_else(|| {
            BackendError::Rejected("Could not auto-detect game install location! Please enter it manually.".to_string())
        })
    }

    async fn install_yacc_caller(&self, game_path: &str) -> Result<String, BackendError> {
        tracing::info!("Running YACC install");

        if !fs::try_exists(&self.release_archive).await? {
            return Err(BackendError::Rejected(format!(
                "YACC release archive not found at {}",
                self.release_archive.display()
            )));
        }

        let archive = self.release_archive.clone();
        let target = PathBuf::from(game_path);
        let written = tokio::task::spawn_blocking(move || extract_release(&archive, &target))
            .await
            .map_err(|e| BackendError::Rejected(format!("installer task failed: {e}")))??;

        tracing::info!("Extracted {} files", written);
        Ok(format!("Installed YACC to {}", game_path))
    }

    async fn launch_yacc(&self, game_install: &GameInstall, bypass_checks: bool) -> Result<String, BackendError> {
        let host_os = std::env::consts::OS;

        if !bypass_checks && (host_os != "windows" || game_install.install_type != InstallType::STEAM) {
            return Err(BackendError::Rejected(format!(
                "Not yet implemented for \"{}\" with COD4 installed via \"{:?}\"",
                host_os, game_install.install_type
            )));
        }

        let game_dir = PathBuf::from(&game_install.game_path);
        if !fs::try_exists(&game_dir).await.unwrap_or(false) {
            return Err(BackendError::Rejected("Couldn't access COD4 directory".to_string()));
        }

        // YACC.exe expects to be run from the game folder
        let mut child = Command::new(game_dir.join(YACC_EXECUTABLE)).current_dir(&game_dir).spawn()?;
        self.events.send(BackendEvent::YaccRunning(true));

        let events = self.events.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => tracing::info!("YACC exited with {}", status),
                Err(e) => tracing::warn!("Lost track of the YACC process: {}", e),
            }
            events.send(BackendEvent::YaccRunning(false));
        });

        Ok("Launched game".to_string())
    }
}

fn locate_steam_install() -> Option<GameInstall> {
    let steam_dir = match SteamDir::locate() {
        Ok(steam_dir) => steam_dir,
        Err(e) => {
            tracing::info!("Couldn't locate Steam on this computer: {}", e);
            return None;
        }
    };

    match steam_dir.find_app(COD4_STEAM_ID) {
        Ok(Some((app, library))) => Some(GameInstall {
            game_path: library.resolve_app_dir(&app).to_string_lossy().into_owned(),
            install_type: InstallType::STEAM,
        }),
        Ok(None) => {
            tracing::info!("Couldn't locate COD4 Steam install");
            None
        }
        Err(e) => {
            tracing::warn!("Failed reading Steam libraries: {}", e);
            None
        }
    }
}

fn extract_release(archive_path: &Path, target: &Path) -> Result<usize, BackendError> {
    let file = std::fs::File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;
    let mut written = 0;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(name) = entry.enclosed_name() else {
            tracing::warn!("Skipping unsafe archive entry {}", entry.name());
            continue;
        };
        let Ok(relative) = name.strip_prefix(ARCHIVE_ROOT) else {
            continue;
        };
        let out = target.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut outfile = std::fs::File::create(&out)?;
        std::io::copy(&mut entry, &mut outfile)?;
        tracing::debug!("Write file {}", out.display());
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::{ZipWriter, write::SimpleFileOptions};

    use super::*;

    fn backend(archive: &Path) -> (LocalBackend, mpsc::UnboundedReceiver<BackendEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (LocalBackend::new(archive, tx), rx)
    }

    fn write_release(path: &Path) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        zip.add_directory("YACC/main/", options).unwrap();
        zip.start_file("YACC/main/yacc.iwd", options).unwrap();
        zip.write_all(b"iwd").unwrap();
        zip.start_file("YACC/YACC.exe", options).unwrap();
        zip.write_all(b"exe").unwrap();
        zip.start_file("README.txt", options).unwrap();
        zip.write_all(b"not installed").unwrap();
        zip.finish().unwrap();
    }

    #[tokio::test]
    async fn verify_requires_game_executable() {
        let game = tempfile::tempdir().unwrap();
        let (backend, _rx) = backend(&game.path().join("missing.zip"));
        let game_path = game.path().to_string_lossy().to_string();

        assert!(!backend.verify_install_location(&game_path).await.unwrap());

        std::fs::write(game.path().join(GAME_EXECUTABLE), b"").unwrap();
        assert!(backend.verify_install_location(&game_path).await.unwrap());
    }

    #[tokio::test]
    async fn yacc_install_is_detected_by_its_executable() {
        let game = tempfile::tempdir().unwrap();
        let (backend, _rx) = backend(&game.path().join("missing.zip"));
        let game_path = game.path().to_string_lossy().to_string();
        std::fs::write(game.path().join(GAME_EXECUTABLE), b"").unwrap();

        assert!(!backend.is_yacc_installed(&game_path).await.unwrap());

        std::fs::write(game.path().join(YACC_EXECUTABLE), b"").unwrap();
        assert!(backend.is_yacc_installed(&game_path).await.unwrap());
    }

    #[tokio::test]
    async fn install_extracts_only_the_yacc_folder() {
        let data = tempfile::tempdir().unwrap();
        let game = tempfile::tempdir().unwrap();
        let archive = data.path().join("yacc-release.zip");
        write_release(&archive);

        let (backend, _rx) = backend(&archive);
        let game_path = game.path().to_string_lossy().to_string();
        let message = backend.install_yacc_caller(&game_path).await.unwrap();

        assert!(message.starts_with("Installed YACC"));
        assert_eq!(std::fs::read(game.path().join("main").join("yacc.iwd")).unwrap(), b"iwd");
        assert_eq!(std::fs::read(game.path().join("YACC.exe")).unwrap(), b"exe");
        assert!(!game.path().join("README.txt").exists());
    }

    #[tokio::test]
    async fn install_without_archive_is_rejected() {
        let data = tempfile::tempdir().unwrap();
        let (backend, _rx) = backend(&data.path().join("yacc-release.zip"));

        let err = backend.install_yacc_caller("C:/cod4").await.unwrap_err();
        assert!(err.to_string().contains("release archive not found"));
    }

    #[tokio::test]
    async fn launch_refuses_unsupported_setups() {
        let (backend, mut rx) = backend(Path::new("unused.zip"));
        let install = GameInstall { game_path: "C:/cod4".to_string(), install_type: InstallType::UNKNOWN };

        let err = backend.launch_yacc(&install, false).await.unwrap_err();
        assert!(err.to_string().starts_with("Not yet implemented"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn launch_with_bypass_still_needs_the_directory() {
        let (backend, _rx) = backend(Path::new("unused.zip"));
        let install = GameInstall { game_path: "/definitely/not/here".to_string(), install_type: InstallType::UNKNOWN };

        let err = backend.launch_yacc(&install, true).await.unwrap_err();
        assert_eq!(err.to_string(), "Couldn't access COD4 directory");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn launch_reports_running_until_exit() {
        use std::os::unix::fs::PermissionsExt;

        let game = tempfile::tempdir().unwrap();
        let executable = game.path().join(YACC_EXECUTABLE);
        std::fs::write(&executable, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&executable, std::fs::Permissions::from_mode(0o755)).unwrap();

        let (backend, mut rx) = backend(Path::new("unused.zip"));
        let install =
            GameInstall { game_path: game.path().to_string_lossy().to_string(), install_type: InstallType::UNKNOWN };

        assert_eq!(backend.launch_yacc(&install, true).await.unwrap(), "Launched game");
        assert_eq!(rx.recv().await, Some(BackendEvent::YaccRunning(true)));
        assert_eq!(rx.recv().await, Some(BackendEvent::YaccRunning(false)));
    }
}
