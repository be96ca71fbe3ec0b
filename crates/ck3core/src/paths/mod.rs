//! Relative-path normalization for mod file sets.
//!
//! Mod archives are frequently built on Windows (backslash separators) while
//! the game and this tool run on Linux. File sets therefore store
//! forward-slash relative paths with no leading slash, NFC-normalized so that
//! archive entries and directory walks compare equal. Case is preserved:
//! CK3 game-data paths are case-sensitive.

use unicode_normalization::UnicodeNormalization;

/// Extension of a mod's own descriptor file. The descriptor is metadata, not
/// game data, and never participates in conflict detection.
pub const DESCRIPTOR_EXTENSION: &str = ".mod";

/// Normalize a relative path for storage in a file set.
/// `common\landed_titles\00_titles.txt` -> `common/landed_titles/00_titles.txt`
pub fn normalize_relative(path: &str) -> String {
    let nfc: String = path.nfc().collect();
    nfc.replace('\\', "/").trim_start_matches('/').to_string()
}

/// Get the filename from a path (handles both / and \).
pub fn file_name(path: &str) -> &str {
    path.rfind(['\\', '/'])
        .map(|idx| &path[idx + 1..])
        .unwrap_or(path)
}

/// Whether the filename component starts with a dot (hidden marker).
pub fn is_hidden(path: &str) -> bool {
    file_name(path).starts_with('.')
}

/// Whether the path names a mod descriptor file.
pub fn is_descriptor(path: &str) -> bool {
    path.ends_with(DESCRIPTOR_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_relative() {
        assert_eq!(
            normalize_relative("common\\landed_titles\\00_titles.txt"),
            "common/landed_titles/00_titles.txt"
        );
        assert_eq!(
            normalize_relative("events/my_events.txt"),
            "events/my_events.txt"
        );
        assert_eq!(normalize_relative("/gfx/flags/a.dds"), "gfx/flags/a.dds");
        assert_eq!(normalize_relative("mixed\\path/style"), "mixed/path/style");
    }

    #[test]
    fn test_normalize_preserves_case() {
        assert_eq!(normalize_relative("Gui\\Widgets.GUI"), "Gui/Widgets.GUI");
    }

    #[test]
    fn test_unicode_normalization() {
        // Precomposed and decomposed forms of the same name normalize alike.
        let precomposed = "localization/église.yml";
        let decomposed = "localization/e\u{0301}glise.yml";
        assert_eq!(
            normalize_relative(precomposed),
            normalize_relative(decomposed)
        );
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("common/traits/00_traits.txt"), "00_traits.txt");
        assert_eq!(file_name("common\\traits\\00_traits.txt"), "00_traits.txt");
        assert_eq!(file_name("descriptor.mod"), "descriptor.mod");
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(".git"));
        assert!(is_hidden("events/.DS_Store"));
        assert!(!is_hidden("events/my_events.txt"));
    }

    #[test]
    fn test_is_descriptor() {
        assert!(is_descriptor("descriptor.mod"));
        assert!(is_descriptor("mod/ugc_12345.mod"));
        assert!(!is_descriptor("common/on_action/00_death.txt"));
        assert!(!is_descriptor("music/my.mod.ogg"));
    }
}
