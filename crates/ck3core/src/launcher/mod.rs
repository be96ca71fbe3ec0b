//! Launching the game.
//!
//! The normal path is the Steam protocol URL, which lets Steam handle DRM
//! and overlays. A direct-binary path exists for non-Steam installs.

use std::path::Path;
use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result};

use crate::gamedef::STEAM_APP_ID;

/// Ask Steam to run the game. Tries `xdg-open` on the `steam://run/` URL
/// first; if that handler is missing, falls back to invoking `steam`
/// directly.
pub fn launch_via_steam() -> Result<()> {
    let url = format!("steam://run/{STEAM_APP_ID}");

    let opened = Command::new("xdg-open")
        .arg(&url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if let Ok(status) = opened {
        if status.success() {
            tracing::info!(%url, "launched via xdg-open");
            return Ok(());
        }
    }

    Command::new("steam")
        .arg(&url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("Failed to launch the game: neither xdg-open nor steam is available")?;
    tracing::info!(%url, "launched via steam");
    Ok(())
}

/// Launch the game binary directly, with the binary's directory as the
/// working directory.
pub fn launch_binary(binary: &Path, arguments: &[String]) -> Result<Child> {
    if !binary.is_file() {
        anyhow::bail!("Game binary not found at {}", binary.display());
    }

    let mut cmd = Command::new(binary);
    cmd.args(arguments);
    if let Some(dir) = binary.parent() {
        cmd.current_dir(dir);
    }

    tracing::info!(binary = %binary.display(), "launching game binary");
    cmd.spawn()
        .with_context(|| format!("Failed to launch {}", binary.display()))
}
