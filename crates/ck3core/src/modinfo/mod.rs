//! Mod metadata snapshots.
//!
//! A [`ModEntry`] is the read-only row shape the launcher database hands out
//! for each mod in a playset: identity, naming, version, and where the mod's
//! content lives. Content is either an expanded directory, a zip archive, or
//! (for malformed rows) neither — such a mod simply contributes no files.

use std::path::PathBuf;

/// Display name used when a mod carries neither a display name nor an
/// internal name.
pub const UNKNOWN_MOD_NAME: &str = "Unknown Mod";

/// One mod as known to the launcher database.
#[derive(Debug, Clone, PartialEq)]
pub struct ModEntry {
    /// Opaque launcher id, unique within the database.
    pub id: String,
    /// Internal name from the descriptor.
    pub name: Option<String>,
    /// User-facing name, when the launcher has one.
    pub display_name: Option<String>,
    /// Supported game version string.
    pub version: Option<String>,
    /// Root directory of the mod's files (expanded mods).
    pub dir_path: Option<PathBuf>,
    /// Path to the mod's zip archive (packed mods).
    pub archive_path: Option<PathBuf>,
    /// Thumbnail image path, if any.
    pub thumbnail_path: Option<String>,
    /// Whether the mod is enabled in its playset.
    pub enabled: bool,
    /// Load position within its playset (lower loads first).
    pub position: i64,
}

impl ModEntry {
    pub fn new(id: impl Into<String>) -> Self {
        ModEntry {
            id: id.into(),
            name: None,
            display_name: None,
            version: None,
            dir_path: None,
            archive_path: None,
            thumbnail_path: None,
            enabled: false,
            position: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_dir_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir_path = Some(path.into());
        self
    }

    pub fn with_archive_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive_path = Some(path.into());
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Resolved display name: display name, else internal name, else
    /// [`UNKNOWN_MOD_NAME`]. Empty strings count as absent.
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.name.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(UNKNOWN_MOD_NAME)
    }

    /// Whether the entry points at any content at all.
    pub fn has_content(&self) -> bool {
        self.dir_path.is_some() || self.archive_path.is_some()
    }
}
