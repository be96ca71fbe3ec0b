//! Local mod discovery and load-order application.
//!
//! The game reads its mod list from descriptor files in the documents `mod/`
//! directory (the launcher writes one there for every mod, Workshop
//! subscriptions included) plus `dlc_load.json` for which of them are enabled
//! and in what order. This module scans the former and writes the latter.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{DlcLoad, ModDescriptor};
use crate::gamedef::{GameDef, MOD_DIR_NAME};
use crate::paths;

/// A mod discovered through its descriptor file.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalMod {
    pub descriptor: ModDescriptor,
    /// Absolute path of the `.mod` file this entry came from.
    pub descriptor_path: PathBuf,
    /// Whether the user has this mod enabled.
    pub enabled: bool,
}

impl LocalMod {
    /// Descriptor path as the game expects it in `dlc_load.json`:
    /// `mod/<file>.mod`, relative to the documents directory.
    pub fn game_relative_descriptor(&self) -> String {
        let file_name = self
            .descriptor_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{MOD_DIR_NAME}/{file_name}")
    }

    /// Absolute content directory, when the descriptor names one. Relative
    /// descriptor paths resolve against the documents directory.
    pub fn content_dir(&self, game: &GameDef) -> Option<PathBuf> {
        let raw = self.descriptor.path.as_deref()?;
        let path = Path::new(raw);
        if path.is_absolute() {
            Some(path.to_path_buf())
        } else {
            Some(game.documents_dir.join(path))
        }
    }
}

/// Scan the documents `mod/` directory for descriptors. Mods listed in
/// `dlc_load.json` come back enabled; results are sorted by descriptor file
/// name so repeated scans are stable. A missing `mod/` directory yields an
/// empty list.
pub fn scan_local_mods(game: &GameDef) -> Result<Vec<LocalMod>> {
    let mod_dir = game.mod_dir();
    if !mod_dir.is_dir() {
        tracing::debug!(dir = %mod_dir.display(), "no mod directory, nothing to scan");
        return Ok(Vec::new());
    }

    let dlc_load = DlcLoad::read(&game.dlc_load_path())?;

    let mut mods = Vec::new();
    let entries = std::fs::read_dir(&mod_dir)
        .with_context(|| format!("Failed to list {}", mod_dir.display()))?;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || !paths::is_descriptor(&path.to_string_lossy()) {
            continue;
        }

        let descriptor = match ModDescriptor::read(&path) {
            Ok(d) => d,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping unreadable descriptor");
                continue;
            }
        };

        let mut local = LocalMod {
            descriptor,
            descriptor_path: path,
            enabled: false,
        };
        local.enabled = dlc_load
            .enabled_mods
            .iter()
            .any(|m| m == &local.game_relative_descriptor());
        mods.push(local);
    }

    mods.sort_by(|a, b| a.descriptor_path.cmp(&b.descriptor_path));
    Ok(mods)
}

/// Write the enabled mods of `mods`, in slice order, to `dlc_load.json`.
/// The existing `disabled_dlcs` list is preserved.
pub fn save_load_order(game: &GameDef, mods: &[LocalMod]) -> Result<()> {
    let path = game.dlc_load_path();
    let mut dlc_load = DlcLoad::read(&path)?;

    dlc_load.enabled_mods = mods
        .iter()
        .filter(|m| m.enabled)
        .map(|m| m.game_relative_descriptor())
        .collect();

    dlc_load.write(&path)?;
    tracing::info!(enabled = dlc_load.enabled_mods.len(), "saved load order");
    Ok(())
}
