//! Process configuration read from the environment.

use std::env;
use std::path::PathBuf;

/// Settings that do not belong to a record.
///
/// Read once at startup after `.env` has been loaded; command-line flags
/// override individual fields.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    /// Property catalog RON file replacing the built-in catalog.
    pub catalog_path: Option<PathBuf>,

    /// Directory holding `properties.ron` and `record.toml`.
    pub data_dir: Option<PathBuf>,

    /// Where the log file is written.
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// - `ENCHANT_CATALOG`: catalog RON path
    /// - `ENCHANT_DATA_DIR`: content directory
    /// - `ENCHANT_LOG_DIR`: log directory (defaults to the platform cache dir)
    pub fn from_env() -> Self {
        Self {
            catalog_path: read_env::<PathBuf>("ENCHANT_CATALOG"),
            data_dir: read_env::<PathBuf>("ENCHANT_DATA_DIR"),
            log_dir: read_env::<PathBuf>("ENCHANT_LOG_DIR").unwrap_or_else(default_log_dir),
        }
    }
}

/// Get the platform-specific log directory
///
/// - macOS: `~/Library/Caches/enchant/logs`
/// - Linux: `~/.cache/enchant/logs` (or `$XDG_CACHE_HOME/enchant/logs`)
/// - Windows: `%LOCALAPPDATA%\enchant\cache\logs`
/// - Fallback: `/tmp/enchant/logs`
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "enchant")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/enchant"))
        .join("logs")
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let value = env::var(key).ok()?;
    if value.trim().is_empty() {
        return None;
    }
    value.parse().ok()
}
