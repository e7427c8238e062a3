use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use directories::ProjectDirs;

pub const SETTINGS_FILENAME: &str = "yacc-launcher-settings.json";
pub const RELEASE_ARCHIVE_FILENAME: &str = "yacc-release.zip";

struct Directories {
    data: PathBuf,
    settings_file: PathBuf,
    release_archive: PathBuf,
}

static DIRECTORIES: LazyLock<Directories> = LazyLock::new(|| {
    let (config, data) = match ProjectDirs::from("app", "yacc", "yacc-launcher") {
        Some(project_dirs) => (project_dirs.config_dir().to_owned(), project_dirs.data_dir().to_owned()),
        None => {
            tracing::warn!("No home directory found, keeping launcher files in the working directory");
            (PathBuf::from("."), PathBuf::from("."))
        }
    };
    let settings_file = config.join(SETTINGS_FILENAME);
    let release_archive = data.join(RELEASE_ARCHIVE_FILENAME);

    Directories { data, settings_file, release_archive }
});

/// Where the directory picker starts.
pub fn get_data_dir() -> &'static Path {
    &DIRECTORIES.data
}

pub fn get_settings_file() -> &'static Path {
    &DIRECTORIES.settings_file
}

pub fn get_release_archive() -> &'static Path {
    &DIRECTORIES.release_archive
}
