//! Read/write access to the Paradox launcher database.
//!
//! The CK3 launcher keeps all mod metadata and playset membership in
//! `launcher-v2.sqlite` under the Paradox documents directory. Tables used
//! here:
//! - `playsets` — id, name, isActive, createdOn
//! - `mods` — id, name, displayName, version, dirPath, archivePath,
//!   thumbnailPath
//! - `playsets_mods` — playsetId, modId, enabled, position
//!
//! This is a thin access object: queries in, [`ModEntry`]/[`Playset`]
//! snapshots out. Enabled-state filtering is left to callers.

use std::path::Path;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::modinfo::ModEntry;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("launcher database not found at {0}")]
    NotFound(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A playset: a named, ordered, enableable collection of mods.
#[derive(Debug, Clone, PartialEq)]
pub struct Playset {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub created_on: Option<DateTime<Utc>>,
}

/// Connection to the launcher database.
pub struct LauncherDb {
    pool: SqlitePool,
}

impl LauncherDb {
    /// Open the launcher database file. Fails if the file does not exist —
    /// this tool never creates the launcher's database, only the launcher
    /// itself does.
    pub async fn open(path: &Path) -> Result<Self, DbError> {
        if !path.is_file() {
            return Err(DbError::NotFound(path.display().to_string()));
        }

        let url = format!("sqlite://{}", path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&url)
            .await?;
        Ok(LauncherDb { pool })
    }

    /// Wrap an existing pool. Tests use this with an in-memory database.
    pub fn from_pool(pool: SqlitePool) -> Self {
        LauncherDb { pool }
    }

    /// All playsets, newest first.
    pub async fn playsets(&self) -> Result<Vec<Playset>, DbError> {
        let rows = sqlx::query(
            "SELECT id, name, isActive, createdOn FROM playsets ORDER BY createdOn DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(playset_from_row).collect())
    }

    /// The currently active playset, if any.
    pub async fn active_playset(&self) -> Result<Option<Playset>, DbError> {
        let row = sqlx::query(
            "SELECT id, name, isActive, createdOn FROM playsets WHERE isActive = 1 LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(playset_from_row))
    }

    /// Mark one playset active and every other inactive.
    pub async fn set_active_playset(&self, playset_id: &str) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE playsets SET isActive = 0")
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE playsets SET isActive = 1 WHERE id = ?")
            .bind(playset_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::trace!(playset_id, "set active playset");
        Ok(())
    }

    /// Mods in a playset, ordered by load position. This is the input shape
    /// the conflict analyzer consumes (after the caller filters to enabled).
    pub async fn mods_for_playset(&self, playset_id: &str) -> Result<Vec<ModEntry>, DbError> {
        let rows = sqlx::query(
            "SELECT m.id, m.name, m.displayName, m.version, m.dirPath, m.archivePath, \
                    m.thumbnailPath, pm.enabled, pm.position \
             FROM playsets_mods pm \
             JOIN mods m ON pm.modId = m.id \
             WHERE pm.playsetId = ? \
             ORDER BY pm.position ASC",
        )
        .bind(playset_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(mod_from_row).collect())
    }

    /// Every mod known to the launcher, for the add-to-playset picker.
    pub async fn all_mods(&self) -> Result<Vec<ModEntry>, DbError> {
        let rows = sqlx::query(
            "SELECT id, name, displayName, version, dirPath, archivePath, thumbnailPath \
             FROM mods ORDER BY displayName ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(mod_from_row).collect())
    }

    /// Append a mod to a playset at the next free position, enabled.
    /// Returns false (and changes nothing) if it is already a member.
    pub async fn add_mod_to_playset(
        &self,
        playset_id: &str,
        mod_id: &str,
    ) -> Result<bool, DbError> {
        let exists: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM playsets_mods WHERE playsetId = ? AND modId = ?",
        )
        .bind(playset_id)
        .bind(mod_id)
        .fetch_optional(&self.pool)
        .await?;
        if exists.is_some() {
            return Ok(false);
        }

        let max_position: Option<i64> = sqlx::query_scalar(
            "SELECT MAX(position) FROM playsets_mods WHERE playsetId = ?",
        )
        .bind(playset_id)
        .fetch_one(&self.pool)
        .await?;
        let next_position = max_position.map_or(0, |p| p + 1);

        sqlx::query(
            "INSERT INTO playsets_mods (playsetId, modId, enabled, position) \
             VALUES (?, ?, 1, ?)",
        )
        .bind(playset_id)
        .bind(mod_id)
        .bind(next_position)
        .execute(&self.pool)
        .await?;

        tracing::trace!(playset_id, mod_id, position = next_position, "added mod to playset");
        Ok(true)
    }

    /// Remove a mod from a playset. Removing a non-member is a no-op.
    pub async fn remove_mod_from_playset(
        &self,
        playset_id: &str,
        mod_id: &str,
    ) -> Result<(), DbError> {
        sqlx::query("DELETE FROM playsets_mods WHERE playsetId = ? AND modId = ?")
            .bind(playset_id)
            .bind(mod_id)
            .execute(&self.pool)
            .await?;

        tracing::trace!(playset_id, mod_id, "removed mod from playset");
        Ok(())
    }

    /// Persist a reordered mod list: each entry's enabled flag is written and
    /// its position becomes its index in `mods`.
    pub async fn update_playset_mods(
        &self,
        playset_id: &str,
        mods: &[ModEntry],
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        for (position, entry) in mods.iter().enumerate() {
            sqlx::query(
                "UPDATE playsets_mods SET enabled = ?, position = ? \
                 WHERE playsetId = ? AND modId = ?",
            )
            .bind(entry.enabled)
            .bind(position as i64)
            .bind(playset_id)
            .bind(&entry.id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::trace!(playset_id, mods = mods.len(), "updated playset order");
        Ok(())
    }
}

fn playset_from_row(row: &SqliteRow) -> Playset {
    let created_on: Option<String> = row.get("createdOn");
    Playset {
        id: row.get("id"),
        name: row.get("name"),
        is_active: row.get("isActive"),
        created_on: created_on.as_deref().and_then(parse_timestamp),
    }
}

/// The launcher writes ISO 8601 timestamps; tolerate a missing timezone.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}

fn mod_from_row(row: &SqliteRow) -> ModEntry {
    let dir_path: Option<String> = row.get("dirPath");
    let archive_path: Option<String> = row.get("archivePath");

    ModEntry {
        id: row.get("id"),
        name: row.get("name"),
        display_name: row.get("displayName"),
        version: row.get("version"),
        dir_path: dir_path.map(Into::into),
        archive_path: archive_path.map(Into::into),
        thumbnail_path: row.get("thumbnailPath"),
        // The all-mods query carries no membership columns.
        enabled: row.try_get("enabled").unwrap_or(false),
        position: row.try_get("position").unwrap_or(0),
    }
}
