//! Game definition — well-known CK3 paths and identifiers.
//!
//! The launcher database, local mod descriptors, and `dlc_load.json` all live
//! under the Paradox documents directory. The directory is resolved from the
//! user's home by default and can be overridden for tests or non-standard
//! setups.

use std::path::PathBuf;

/// Steam App ID for Crusader Kings III.
pub const STEAM_APP_ID: u32 = 1158310;

/// Filename of the Paradox launcher's SQLite database.
pub const LAUNCHER_DB_FILE: &str = "launcher-v2.sqlite";

/// Filename of the game's enabled-mods/disabled-DLC list.
pub const DLC_LOAD_FILE: &str = "dlc_load.json";

/// Name of the local mod descriptor directory under the documents directory.
pub const MOD_DIR_NAME: &str = "mod";

/// Resolved paths for one game installation.
#[derive(Debug, Clone)]
pub struct GameDef {
    /// Paradox documents directory for CK3
    /// (`~/Documents/Paradox Interactive/Crusader Kings III`).
    pub documents_dir: PathBuf,
}

impl GameDef {
    /// Resolve the default CK3 documents directory for the current user.
    pub fn ck3() -> Self {
        let docs = dirs::document_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/home"))
                .join("Documents")
        });
        GameDef {
            documents_dir: docs.join("Paradox Interactive").join("Crusader Kings III"),
        }
    }

    /// Use an explicit documents directory (tests, portable installs).
    pub fn with_documents_dir(dir: impl Into<PathBuf>) -> Self {
        GameDef {
            documents_dir: dir.into(),
        }
    }

    /// Path to the launcher database.
    pub fn launcher_db_path(&self) -> PathBuf {
        self.documents_dir.join(LAUNCHER_DB_FILE)
    }

    /// Directory containing local `.mod` descriptor files.
    pub fn mod_dir(&self) -> PathBuf {
        self.documents_dir.join(MOD_DIR_NAME)
    }

    /// Path to `dlc_load.json`.
    pub fn dlc_load_path(&self) -> PathBuf {
        self.documents_dir.join(DLC_LOAD_FILE)
    }

    /// Steam Workshop content directory for CK3, if a home directory exists.
    pub fn workshop_dir(&self) -> Option<PathBuf> {
        dirs::home_dir().map(|home| {
            home.join(".local/share/Steam/steamapps/workshop/content")
                .join(STEAM_APP_ID.to_string())
        })
    }
}
