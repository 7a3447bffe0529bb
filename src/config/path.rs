//! Module for searching for remotepad config files

use std::path::PathBuf;

/// Base system fallback path to use if one cannot be found with XDG
const FALLBACK_BASE_PATH: &str = "/usr/share/remotepad";

/// Name of the configuration file in each config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Returns the base path for configuration data
pub fn get_base_path() -> PathBuf {
    let Ok(base_dirs) = xdg::BaseDirectories::with_prefix("remotepad") else {
        log::warn!("Unable to determine config base path. Using fallback path.");
        return PathBuf::from(FALLBACK_BASE_PATH);
    };

    // Get the data directories in preference order
    let data_dirs = base_dirs.get_data_dirs();
    for dir in data_dirs {
        if dir.exists() {
            return dir;
        }
    }

    log::warn!("Config base path not found. Using fallback path.");
    PathBuf::from(FALLBACK_BASE_PATH)
}

/// Returns a list of directories in load order to find the configuration.
/// E.g. ["./rootfs/usr/share/remotepad", "/etc/remotepad", "/usr/share/remotepad"]
pub fn get_config_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("./rootfs/usr/share/remotepad"),
        PathBuf::from("/etc/remotepad"),
        get_base_path(),
    ]
}

/// Returns the first configuration file that exists in the search paths
pub fn find_config_file() -> Option<PathBuf> {
    get_config_paths().into_iter().find_map(|dir| {
        let path = dir.join(CONFIG_FILE_NAME);
        log::trace!("Checking {path:?} for config");
        if path.is_file() {
            Some(path)
        } else {
            None
        }
    })
}
