use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use tracing::info;

use super::saved::SavedBuild;
use crate::catalog::Category;

/// SQLite store for saved builds on this machine.
/// All operations are synchronous (rusqlite is blocking).
/// Callers in async contexts should use `tokio::task::spawn_blocking`.
pub struct BuildStore {
    conn: Connection,
}

impl BuildStore {
    /// Create or open the builds database.
    /// The db_path is the full path to the SQLite file.
    /// Typically called with: `mobomojo::default_store_path()`
    pub fn new(db_path: &Path) -> Result<Self, String> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create data dir: {}", e))?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| format!("Failed to open builds db: {}", e))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS saved_builds (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                build_name TEXT NOT NULL,
                components_json TEXT NOT NULL,
                total_price INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_builds_created ON saved_builds(created_at DESC);",
        )
        .map_err(|e| format!("Failed to create builds table: {}", e))?;

        info!("Opened builds database at {:?}", db_path);
        Ok(Self { conn })
    }

    /// Persist a build. Returns the assigned id.
    ///
    /// `created_at` is stored in UTC so that listing can order by the text
    /// column.
    pub fn save_build(&self, build: &SavedBuild) -> Result<i64, String> {
        build.validate()?;

        let created_at = DateTime::parse_from_rfc3339(&build.created_at)
            .map_err(|e| format!("Invalid createdAt '{}': {}", build.created_at, e))?
            .with_timezone(&Utc)
            .to_rfc3339();

        let components_json = serde_json::to_string(&build.components)
            .map_err(|e| format!("Failed to serialize components: {}", e))?;
        let total_price = i64::try_from(build.total_price)
            .map_err(|_| format!("Total price {} out of range", build.total_price))?;

        self.conn
            .execute(
                "INSERT INTO saved_builds (build_name, components_json, total_price, created_at)
             VALUES (?1, ?2, ?3, ?4)",
                params![build.build_name, components_json, total_price, created_at],
            )
            .map_err(|e| format!("Failed to insert build: {}", e))?;

        let id = self.conn.last_insert_rowid();
        info!(
            "Saved build {} '{}' with {} components",
            id,
            build.build_name,
            build.components.len()
        );
        Ok(id)
    }

    /// List all saved builds, newest first.
    pub fn list_builds(&self) -> Result<Vec<SavedBuild>, String> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, build_name, components_json, total_price, created_at
             FROM saved_builds
             ORDER BY created_at DESC, id DESC",
            )
            .map_err(|e| format!("Failed to prepare query: {}", e))?;

        let rows = stmt
            .query_map([], row_to_build)
            .map_err(|e| format!("Failed to query builds: {}", e))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Failed to collect builds: {}", e))
    }

    /// Get a single saved build.
    pub fn get_build(&self, build_id: i64) -> Result<SavedBuild, String> {
        self.conn
            .query_row(
                "SELECT id, build_name, components_json, total_price, created_at
             FROM saved_builds WHERE id = ?1",
                params![build_id],
                row_to_build,
            )
            .map_err(|e| format!("Build not found: {}", e))
    }

    /// Delete a saved build. Returns false if no such build existed.
    pub fn delete_build(&self, build_id: i64) -> Result<bool, String> {
        let removed = self
            .conn
            .execute("DELETE FROM saved_builds WHERE id = ?1", params![build_id])
            .map_err(|e| format!("Failed to delete build: {}", e))?;

        info!("Deleted build {} ({} rows)", build_id, removed);
        Ok(removed > 0)
    }
}

fn row_to_build(row: &Row<'_>) -> rusqlite::Result<SavedBuild> {
    let components_json: String = row.get(2)?;
    let components: BTreeMap<Category, String> = serde_json::from_str(&components_json)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;
    let total_price: i64 = row.get(3)?;

    Ok(SavedBuild {
        id: Some(row.get(0)?),
        build_name: row.get(1)?,
        components,
        total_price: total_price.max(0) as u64,
        created_at: row.get(4)?,
    })
}
