use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "typetest";
const DB_FILE: &str = "typing_test.db";
const CONFIG_FILE: &str = "config.json";

/// Overrides the directory holding the results database
pub const STATE_DIR_ENV: &str = "TYPETEST_STATE_DIR";
/// Overrides the config file location
pub const CONFIG_ENV: &str = "TYPETEST_CONFIG";

/// Where the database and config file live when nothing else is given
pub struct AppDirs;

impl AppDirs {
    pub fn state_dir() -> Option<PathBuf> {
        resolve_state_dir(
            std::env::var_os(STATE_DIR_ENV).map(PathBuf::from),
            std::env::var_os("HOME").map(PathBuf::from),
        )
    }

    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join(DB_FILE))
    }

    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(format!("{APP_NAME}_{CONFIG_FILE}")))
    }
}

// Explicit override, then the XDG-style state dir under $HOME, then the
// platform's local data dir.
fn resolve_state_dir(overridden: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(dir) = overridden.filter(|d| !d.as_os_str().is_empty()) {
        return Some(dir);
    }
    match home {
        Some(home) => Some(xdg_state_dir(&home)),
        None => ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf()),
    }
}

fn xdg_state_dir(home: &Path) -> PathBuf {
    home.join(".local").join("state").join(APP_NAME)
}
