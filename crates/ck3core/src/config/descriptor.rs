//! Paradox `.mod` descriptor files.
//!
//! A descriptor is a flat `key="value"` file the launcher writes into the
//! documents `mod/` directory, one per known mod (local and Workshop alike):
//!
//! ```text
//! name="My Mod"
//! path="mod/my_mod"
//! supported_version="1.12.*"
//! remote_file_id="123456"
//! ```
//!
//! Only the quoted-value keys we care about are extracted. Unknown keys and
//! anything outside the `key="value"` shape are ignored, which matches how
//! tolerant the game itself is of these files.

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

/// Parsed contents of one `.mod` descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModDescriptor {
    /// Mod name. Falls back to the descriptor's file stem when the key is
    /// missing, so every descriptor yields something displayable.
    pub name: String,
    /// Content location, usually relative to the documents directory
    /// (`mod/my_mod`) but absolute for Workshop mods.
    pub path: Option<String>,
    /// Game version pattern the mod declares support for, e.g. `1.12.*`.
    pub supported_version: Option<String>,
    /// Steam Workshop file id, present only for subscribed mods.
    pub remote_file_id: Option<String>,
    /// Thumbnail image, relative to the mod's content directory.
    pub picture: Option<String>,
}

fn quoted_value(content: &str, key: &str) -> Option<String> {
    let re = Regex::new(&format!(r#"(?m)^\s*{key}\s*=\s*"(.*?)""#)).unwrap();
    re.captures(content).map(|c| c[1].to_string())
}

impl ModDescriptor {
    /// Parse descriptor text. `fallback_name` stands in for a missing `name`
    /// key; callers pass the file stem.
    pub fn parse(content: &str, fallback_name: &str) -> Self {
        ModDescriptor {
            name: quoted_value(content, "name").unwrap_or_else(|| fallback_name.to_string()),
            path: quoted_value(content, "path"),
            supported_version: quoted_value(content, "supported_version"),
            remote_file_id: quoted_value(content, "remote_file_id"),
            picture: quoted_value(content, "picture"),
        }
    }

    /// Read and parse a descriptor file.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read descriptor {}", path.display()))?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::parse(&content, &stem))
    }

    /// Whether this descriptor points at Steam Workshop content.
    pub fn is_workshop(&self) -> bool {
        self.remote_file_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_descriptor() {
        let content = r#"
            name="Test Mod"
            path="mod/test_mod"
            supported_version="1.12.*"
            remote_file_id="123456"
        "#;
        let desc = ModDescriptor::parse(content, "test");

        assert_eq!(desc.name, "Test Mod");
        assert_eq!(desc.path.as_deref(), Some("mod/test_mod"));
        assert_eq!(desc.supported_version.as_deref(), Some("1.12.*"));
        assert_eq!(desc.remote_file_id.as_deref(), Some("123456"));
        assert!(desc.is_workshop());
    }

    #[test]
    fn test_parse_minimal_descriptor() {
        let desc = ModDescriptor::parse(r#"name="Simple Mod""#, "simple");
        assert_eq!(desc.name, "Simple Mod");
        assert!(desc.path.is_none());
        assert!(desc.supported_version.is_none());
        assert!(!desc.is_workshop());
    }

    #[test]
    fn test_missing_name_uses_fallback() {
        let desc = ModDescriptor::parse(r#"path="mod/unnamed""#, "unnamed");
        assert_eq!(desc.name, "unnamed");
    }

    #[test]
    fn test_read_uses_file_stem_as_fallback() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("my_local_mod.mod");
        std::fs::write(&path, "version=\"1.0\"\n").unwrap();

        let desc = ModDescriptor::read(&path).unwrap();
        assert_eq!(desc.name, "my_local_mod");
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(ModDescriptor::read(&tmp.path().join("gone.mod")).is_err());
    }
}
