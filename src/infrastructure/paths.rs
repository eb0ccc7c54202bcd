//! Filesystem location defaults.
//!
//! Resolves the per-user directories the client writes to (logs) and reads
//! from (configuration). Both honor `HOME`; when it is unset the current
//! directory is used so the binary still runs in minimal containers.

use std::path::PathBuf;

/// Returns the default directory for log files.
///
/// `$HOME/.local/share/meridian`, or `./.meridian` when `HOME` is unset.
#[must_use]
pub fn default_log_dir() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".meridian"),
        |home| PathBuf::from(home).join(".local/share/meridian"),
    )
}

/// Returns the default configuration file path.
///
/// `$HOME/.config/meridian/config.toml`, or `./meridian.toml` when `HOME`
/// is unset.
#[must_use]
pub fn default_config_path() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from("meridian.toml"),
        |home| PathBuf::from(home).join(".config/meridian/config.toml"),
    )
}
