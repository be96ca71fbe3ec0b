//! File conflict detection between mods.
//!
//! When two enabled mods ship the same relative file, the game silently lets
//! the mod loaded last overwrite the other's version. This module computes
//! each mod's file set (directory tree or zip archive) and reports every
//! relative path claimed by two or more mods, so the overlap is visible
//! before it causes hard-to-diagnose bugs in-game.
//!
//! File sets are cached per mod id for the lifetime of the analyzer, since a
//! conflict check re-runs on every enable toggle and re-walking unchanged
//! mods would dominate the cost. The cache never expires on its own: a mod
//! replaced on disk mid-session keeps serving its stale file set until
//! [`ConflictAnalyzer::invalidate`] is called for it.

pub mod worker;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::modinfo::ModEntry;
use crate::paths;

/// Which content source a scan diagnostic came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanSource {
    Archive,
    Directory,
}

/// A swallowed per-mod scan failure, kept for operator visibility.
///
/// Scan failures never fail an analysis; they degrade the affected mod's
/// file set and surface here (and in the log).
#[derive(Debug, Clone)]
pub struct ScanDiagnostic {
    pub mod_id: String,
    pub source: ScanSource,
    pub message: String,
}

/// The files a single mod contributes, plus any trouble hit while scanning.
#[derive(Debug, Default)]
pub struct FileSet {
    /// Relative paths, forward-slash separated, descriptor files excluded.
    pub files: BTreeSet<String>,
    /// Failures that degraded this set (missing archive, unreadable dir, ...).
    pub diagnostics: Vec<ScanDiagnostic>,
}

/// Result of analyzing a mod list: every path provided by two or more mods.
#[derive(Debug, Default)]
pub struct ConflictReport {
    /// Path -> contributing mods' display names, in input (load) order.
    /// Every value has at least two entries.
    pub conflicts: BTreeMap<String, Vec<String>>,
    /// Scan diagnostics gathered from every mod in the analysis.
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Number of conflicting paths.
    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    /// Invert path -> mods into mod -> the other mods it overlaps with.
    /// This is the per-mod "conflicts with" view the mod list renders.
    pub fn overlaps_by_mod(&self) -> HashMap<String, BTreeSet<String>> {
        let mut map: HashMap<String, BTreeSet<String>> = HashMap::new();
        for names in self.conflicts.values() {
            for name in names {
                let others = names.iter().filter(|n| *n != name).cloned();
                map.entry(name.clone()).or_default().extend(others);
            }
        }
        map
    }
}

/// Computes and caches per-mod file sets and analyzes playsets for overlap.
///
/// The cache is owned by the analyzer instance; two analyzers never share
/// state. The analyze operation is a pure function of (mod list, cache), and
/// the cache only ever grows.
#[derive(Debug, Default)]
pub struct ConflictAnalyzer {
    cache: Mutex<HashMap<String, Arc<FileSet>>>,
}

impl ConflictAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the file set a mod contributes, computing and caching it on first
    /// use.
    ///
    /// Never fails: a missing or corrupt source degrades to a partial or
    /// empty set with a diagnostic attached. Repeated calls for the same mod
    /// id return the identical cached object.
    pub fn file_set(&self, entry: &ModEntry) -> Arc<FileSet> {
        // Lookup and insert happen under one lock so two concurrent analyses
        // cannot race into duplicate scans of the same mod.
        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(set) = cache.get(&entry.id) {
            tracing::debug!(mod_id = %entry.id, "file set cache hit");
            return Arc::clone(set);
        }

        let set = Arc::new(scan_mod(entry));
        tracing::debug!(
            mod_id = %entry.id,
            files = set.files.len(),
            "computed file set"
        );
        cache.insert(entry.id.clone(), Arc::clone(&set));
        set
    }

    /// Drop the cached file set for one mod id, forcing a re-scan on next
    /// use. Returns whether an entry was present.
    pub fn invalidate(&self, mod_id: &str) -> bool {
        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        cache.remove(mod_id).is_some()
    }

    /// Analyze an ordered mod list for file conflicts.
    ///
    /// The caller passes the mods it wants considered (normally the enabled
    /// mods of the active playset, in load order). Input order determines the
    /// order of each path's contributor list, not the set of conflicts.
    pub fn analyze(&self, mods: &[ModEntry]) -> ConflictReport {
        let mut by_path: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut diagnostics = Vec::new();

        for entry in mods {
            let set = self.file_set(entry);
            diagnostics.extend(set.diagnostics.iter().cloned());
            for path in &set.files {
                by_path
                    .entry(path.clone())
                    .or_default()
                    .push(entry.display_name().to_string());
            }
        }

        let conflicts = by_path
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .collect();

        ConflictReport {
            conflicts,
            diagnostics,
        }
    }
}

/// Scan a mod's content sources and collect its relative file paths.
/// Archive and directory contributions are unioned when a row carries both.
fn scan_mod(entry: &ModEntry) -> FileSet {
    let mut set = FileSet::default();

    if let Some(archive) = &entry.archive_path {
        scan_archive(&entry.id, archive, &mut set);
    }
    if let Some(dir) = &entry.dir_path {
        scan_directory(&entry.id, dir, &mut set);
    }
    if !entry.has_content() {
        tracing::debug!(mod_id = %entry.id, "mod has no content location");
    }

    set
}

fn scan_archive(mod_id: &str, archive: &Path, set: &mut FileSet) {
    if !archive.is_file() {
        note(
            set,
            mod_id,
            ScanSource::Archive,
            format!("archive not found: {}", archive.display()),
        );
        return;
    }

    let file = match std::fs::File::open(archive) {
        Ok(f) => f,
        Err(e) => {
            note(
                set,
                mod_id,
                ScanSource::Archive,
                format!("cannot open archive {}: {e}", archive.display()),
            );
            return;
        }
    };

    let zip = match zip::ZipArchive::new(file) {
        Ok(z) => z,
        Err(e) => {
            note(
                set,
                mod_id,
                ScanSource::Archive,
                format!("not a readable zip archive {}: {e}", archive.display()),
            );
            return;
        }
    };

    for name in zip.file_names() {
        let normalized = paths::normalize_relative(name);
        // Trailing slash marks a directory entry.
        if normalized.is_empty()
            || normalized.ends_with('/')
            || paths::is_descriptor(&normalized)
        {
            continue;
        }
        set.files.insert(normalized);
    }
}

fn scan_directory(mod_id: &str, root: &Path, set: &mut FileSet) {
    if !root.is_dir() {
        note(
            set,
            mod_id,
            ScanSource::Directory,
            format!("mod directory not found: {}", root.display()),
        );
        return;
    }

    for entry in walkdir::WalkDir::new(root) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                note(set, mod_id, ScanSource::Directory, format!("walk error: {e}"));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if file_name.starts_with('.') || file_name.ends_with(paths::DESCRIPTOR_EXTENSION) {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        set.files
            .insert(paths::normalize_relative(&relative.to_string_lossy()));
    }
}

fn note(set: &mut FileSet, mod_id: &str, source: ScanSource, message: String) {
    tracing::warn!(mod_id = %mod_id, source = ?source, "{message}");
    set.diagnostics.push(ScanDiagnostic {
        mod_id: mod_id.to_string(),
        source,
        message,
    });
}
