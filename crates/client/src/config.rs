//! Shell configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use bubblepop_persistence::PersistConfig;

const APPLICATION: &str = "bubblepop";

/// Configuration required to bootstrap the shell.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Directory holding the key-value files.
    pub data_dir: PathBuf,
    /// Directory holding `bubblepop.log`.
    pub log_dir: PathBuf,
    pub persist: PersistConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_dir: default_log_dir(),
            persist: PersistConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BUBBLEPOP_DATA_DIR` - Directory for save data (default: platform-specific)
    /// - `BUBBLEPOP_LOG_DIR` - Directory for log files (default: platform-specific)
    /// - `BUBBLEPOP_AUTOSAVE` - Enable auto-persistence (default: true)
    /// - `BUBBLEPOP_DEBOUNCE_MS` - Auto-save debounce window (default: 500)
    pub fn from_env() -> Self {
        let mut config = Self {
            persist: PersistConfig::from_env(),
            ..Self::default()
        };

        if let Some(dir) = read_path("BUBBLEPOP_DATA_DIR") {
            config.data_dir = dir;
        }

        if let Some(dir) = read_path("BUBBLEPOP_LOG_DIR") {
            config.log_dir = dir;
        }

        config
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_persist(mut self, persist: PersistConfig) -> Self {
        self.persist = persist;
        self
    }
}

fn read_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Platform data directory.
///
/// - macOS: `~/Library/Application Support/bubblepop`
/// - Linux: `~/.local/share/bubblepop` (or `$XDG_DATA_HOME/bubblepop`)
/// - Windows: `%APPDATA%\bubblepop`
/// - Fallback: `./save_data`
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APPLICATION)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}

/// Platform log directory: the cache directory plus `logs`.
///
/// Falls back to `/tmp/bubblepop/logs`.
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APPLICATION)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/bubblepop"))
        .join("logs")
}
