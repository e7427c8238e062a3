use std::path::{Path, PathBuf};

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectorySelection {
    Single(PathBuf),
    Multiple(Vec<PathBuf>),
    Cancelled,
}

#[async_trait]
pub trait DirectoryPicker: Send + Sync {
    async fn pick_directory(&self, default_dir: &Path) -> DirectorySelection;
}

/// Blocking modal shown to the user.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn alert(&self, message: &str);
}

pub struct RfdDirectoryPicker;

#[async_trait]
impl DirectoryPicker for RfdDirectoryPicker {
    async fn pick_directory(&self, default_dir: &Path) -> DirectorySelection {
        let folder = rfd::AsyncFileDialog::new().set_directory(default_dir).pick_folder().await;

        match folder {
            Some(folder) => DirectorySelection::Single(folder.path().to_path_buf()),
            None => DirectorySelection::Cancelled,
        }
    }
}

pub struct RfdNotifier;

#[async_trait]
impl Notifier for RfdNotifier {
    async fn alert(&self, message: &str) {
        rfd::AsyncMessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("YACC Launcher")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show()
            .await;
    }
}
