//! `dlc_load.json` — the file the game itself reads at startup.
//!
//! Shape on disk:
//!
//! ```json
//! {"disabled_dlcs": [], "enabled_mods": ["mod/ugc_12345.mod", "mod/local.mod"]}
//! ```
//!
//! `enabled_mods` holds descriptor paths relative to the documents directory,
//! in load order. Writing this file is how a load order is applied without
//! going through the official launcher.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DlcLoad {
    #[serde(default)]
    pub disabled_dlcs: Vec<String>,
    #[serde(default)]
    pub enabled_mods: Vec<String>,
}

impl DlcLoad {
    /// Read `dlc_load.json`. A missing file reads as the empty default, since
    /// the game treats it the same way.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(DlcLoad::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Write `dlc_load.json`, pretty-printed the way the launcher writes it.
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), mods = self.enabled_mods.len(), "wrote dlc_load");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_default() {
        let tmp = tempfile::tempdir().unwrap();
        let loaded = DlcLoad::read(&tmp.path().join("dlc_load.json")).unwrap();
        assert_eq!(loaded, DlcLoad::default());
    }

    #[test]
    fn test_write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dlc_load.json");

        let dlc_load = DlcLoad {
            disabled_dlcs: vec!["dlc/dlc001.dlc".to_string()],
            enabled_mods: vec!["mod/ugc_12345.mod".to_string(), "mod/local.mod".to_string()],
        };
        dlc_load.write(&path).unwrap();

        let loaded = DlcLoad::read(&path).unwrap();
        assert_eq!(loaded, dlc_load);
    }

    #[test]
    fn test_reads_launcher_written_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dlc_load.json");
        std::fs::write(
            &path,
            r#"{"disabled_dlcs":[],"enabled_mods":["mod/a.mod"]}"#,
        )
        .unwrap();

        let loaded = DlcLoad::read(&path).unwrap();
        assert_eq!(loaded.enabled_mods, vec!["mod/a.mod"]);
        assert!(loaded.disabled_dlcs.is_empty());
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dlc_load.json");
        std::fs::write(&path, "{}").unwrap();

        let loaded = DlcLoad::read(&path).unwrap();
        assert!(loaded.enabled_mods.is_empty());
        assert!(loaded.disabled_dlcs.is_empty());
    }

    #[test]
    fn test_garbage_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dlc_load.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(DlcLoad::read(&path).is_err());
    }
}
