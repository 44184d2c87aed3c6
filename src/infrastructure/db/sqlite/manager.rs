use crate::infrastructure::db::database::DatabaseError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::sync::Mutex;
use tracing::info;

/// Maps a webhook identifier to its dedicated SQLite database file, opened
/// lazily and cached for reuse.
///
/// The pool map lock is held across the open itself, so two concurrent first
/// accesses for the same webhook never create two pools. When the number of
/// on-disk units reaches the ceiling, the least-recently-modified unit is
/// closed and permanently deleted before a new one is created.
pub struct WebhookDatabaseManager {
    base_path: PathBuf,
    max_databases: usize,
    pools: Mutex<HashMap<String, SqlitePool>>,
}

impl WebhookDatabaseManager {
    pub fn new(
        base_path: impl Into<PathBuf>,
        max_databases: usize,
    ) -> Result<Self, DatabaseError> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path).map_err(DatabaseError::connection)?;

        Ok(Self {
            base_path,
            max_databases,
            pools: Mutex::new(HashMap::new()),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Return the cached pool for this webhook, or evict to capacity and open
    /// (creating if necessary) its database.
    pub async fn get_or_open(&self, webhook_id: &str) -> Result<SqlitePool, DatabaseError> {
        validate_id(webhook_id)?;

        let mut pools = self.pools.lock().await;
        if let Some(pool) = pools.get(webhook_id) {
            return Ok(pool.clone());
        }

        let path = self.database_path(webhook_id);
        if !path.exists() {
            self.evict_to_capacity(&mut pools).await?;
        }

        // Eviction ranks units by main-file modification time, so commits
        // must land in the main database file rather than a WAL sidecar.
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(DatabaseError::connection)?;

        pools.insert(webhook_id.to_string(), pool.clone());
        Ok(pool)
    }

    /// Whether a storage unit for this webhook is open or on disk. Never
    /// creates anything.
    pub async fn exists(&self, webhook_id: &str) -> bool {
        if validate_id(webhook_id).is_err() {
            return false;
        }
        if self.pools.lock().await.contains_key(webhook_id) {
            return true;
        }
        self.database_path(webhook_id).exists()
    }

    fn database_path(&self, webhook_id: &str) -> PathBuf {
        self.base_path.join(format!("{webhook_id}.sqlite"))
    }

    async fn evict_to_capacity(
        &self,
        pools: &mut HashMap<String, SqlitePool>,
    ) -> Result<(), DatabaseError> {
        loop {
            let mut units = self.stored_units()?;
            if units.is_empty() || units.len() < self.max_databases {
                return Ok(());
            }

            // Oldest modification time first; ties broken by file name.
            units.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.id.cmp(&b.id)));
            let evicted = units.remove(0);

            if let Some(pool) = pools.remove(&evicted.id) {
                pool.close().await;
            }
            std::fs::remove_file(&evicted.path).map_err(DatabaseError::query)?;
            let _ = std::fs::remove_file(evicted.path.with_extension("sqlite-wal"));
            let _ = std::fs::remove_file(evicted.path.with_extension("sqlite-shm"));

            info!(webhook_id = %evicted.id, "evicted least-recently-modified storage unit");
        }
    }

    fn stored_units(&self) -> Result<Vec<StoredUnit>, DatabaseError> {
        let entries = std::fs::read_dir(&self.base_path).map_err(DatabaseError::query)?;
        let mut units = Vec::new();

        for entry in entries {
            let entry = entry.map_err(DatabaseError::query)?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("sqlite") {
                continue;
            }

            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);

            units.push(StoredUnit { id, modified, path });
        }

        Ok(units)
    }
}

struct StoredUnit {
    id: String,
    modified: SystemTime,
    path: PathBuf,
}

// Webhook ids become file names; anything that could escape the base
// directory is rejected before touching the filesystem.
fn validate_id(webhook_id: &str) -> Result<(), DatabaseError> {
    if webhook_id.is_empty()
        || webhook_id.contains(['/', '\\'])
        || webhook_id.contains("..")
    {
        return Err(DatabaseError::InvalidIdentifier(webhook_id.to_string()));
    }
    Ok(())
}
