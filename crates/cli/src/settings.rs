//! Configuration resolution: flag > environment > config directory > built-in.
//!
//! Flags and environment variables are resolved by clap (`env = ...`);
//! this module covers the config-directory fallback.

use std::path::{Path, PathBuf};

use certsync_recon::BadgeMap;
use tracing::debug;

use crate::CliError;

pub(crate) const BADGE_MAP_FILE: &str = "badge_map.toml";

/// `<config_dir>/certsync`, e.g. `~/.config/certsync` on Linux.
pub(crate) fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("certsync"))
}

/// Load the badge map from `explicit` (flag or `CERTSYNC_BADGE_MAP`), else
/// from the config directory when the file exists, else the built-in table.
pub(crate) fn load_badge_map(explicit: Option<PathBuf>) -> Result<BadgeMap, CliError> {
    if let Some(path) = explicit {
        let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string());
        return load_from(&expanded);
    }

    match config_dir().map(|d| d.join(BADGE_MAP_FILE)) {
        Some(path) if path.is_file() => load_from(&path),
        _ => {
            debug!("using built-in badge map");
            Ok(BadgeMap::builtin())
        }
    }
}

fn load_from(path: &Path) -> Result<BadgeMap, CliError> {
    debug!(path = %path.display(), "loading badge map");
    BadgeMap::load(path).map_err(|e| {
        CliError::from(e).with_hint(format!("fix or remove {}", path.display()))
    })
}
