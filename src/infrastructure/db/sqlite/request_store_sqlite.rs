use crate::infrastructure::db::dto::{RequestRow, RequestSummaryRow};
use crate::infrastructure::db::sqlite::manager::WebhookDatabaseManager;
use crate::infrastructure::db::stores::request_store::{RequestRepositoryError, RequestStore};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS requests (
        id TEXT PRIMARY KEY,
        webhook_id TEXT NOT NULL,
        method TEXT NOT NULL,
        path TEXT NOT NULL,
        headers TEXT NOT NULL,
        query TEXT NOT NULL,
        query_string TEXT,
        body TEXT,
        ip TEXT,
        url TEXT,
        protocol TEXT,
        host TEXT,
        origin TEXT,
        referrer TEXT,
        user_agent TEXT,
        content_type TEXT,
        content_length INTEGER,
        created_at TEXT NOT NULL
    )
";

const CREATE_INDEX_SQL: &str = "
    CREATE INDEX IF NOT EXISTS idx_requests_created_at ON requests(created_at DESC)
";

// Optional columns added after the first schema shipped; older storage units
// pick them up additively on prepare.
const OPTIONAL_COLUMNS: [(&str, &str); 9] = [
    ("query_string", "TEXT"),
    ("url", "TEXT"),
    ("protocol", "TEXT"),
    ("host", "TEXT"),
    ("origin", "TEXT"),
    ("referrer", "TEXT"),
    ("user_agent", "TEXT"),
    ("content_type", "TEXT"),
    ("content_length", "INTEGER"),
];

#[derive(Clone)]
pub struct RequestStoreSqlite {
    manager: Arc<WebhookDatabaseManager>,
}

impl RequestStoreSqlite {
    /// Build a SQLite-backed request store over the shared database manager.
    pub fn new(manager: Arc<WebhookDatabaseManager>) -> Self {
        Self { manager }
    }

    async fn pool(&self, webhook_id: &str) -> Result<SqlitePool, RequestRepositoryError> {
        let pool = self.manager.get_or_open(webhook_id).await?;
        ensure_schema(&pool).await?;
        Ok(pool)
    }
}

async fn ensure_schema(pool: &SqlitePool) -> Result<(), RequestRepositoryError> {
    sqlx::query(CREATE_TABLE_SQL)
        .execute(pool)
        .await
        .map_err(|_| RequestRepositoryError::StorageUnavailable)?;
    sqlx::query(CREATE_INDEX_SQL)
        .execute(pool)
        .await
        .map_err(|_| RequestRepositoryError::StorageUnavailable)?;
    ensure_columns(pool).await
}

async fn ensure_columns(pool: &SqlitePool) -> Result<(), RequestRepositoryError> {
    let rows = sqlx::query("PRAGMA table_info(requests)")
        .fetch_all(pool)
        .await
        .map_err(|_| RequestRepositoryError::StorageUnavailable)?;

    let present: Vec<String> = rows
        .iter()
        .filter_map(|row| row.try_get::<String, _>("name").ok())
        .collect();

    for (column, column_type) in OPTIONAL_COLUMNS {
        if present.iter().any(|name| name == column) {
            continue;
        }
        sqlx::query(&format!(
            "ALTER TABLE requests ADD COLUMN {column} {column_type}"
        ))
        .execute(pool)
        .await
        .map_err(|_| RequestRepositoryError::StorageUnavailable)?;
    }

    Ok(())
}

#[async_trait]
impl RequestStore for RequestStoreSqlite {
    async fn prepare(&self, webhook_id: &str) -> Result<(), RequestRepositoryError> {
        self.pool(webhook_id).await?;
        Ok(())
    }

    async fn save(&self, row: &RequestRow) -> Result<(), RequestRepositoryError> {
        let pool = self.pool(&row.webhook_id).await?;

        sqlx::query(
            "INSERT OR REPLACE INTO requests (
                id, webhook_id, method, path, headers, query, query_string, body,
                ip, url, protocol, host, origin, referrer, user_agent,
                content_type, content_length, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.webhook_id)
        .bind(&row.method)
        .bind(&row.path)
        .bind(&row.headers)
        .bind(&row.query)
        .bind(&row.query_string)
        .bind(&row.body)
        .bind(&row.ip)
        .bind(&row.url)
        .bind(&row.protocol)
        .bind(&row.host)
        .bind(&row.origin)
        .bind(&row.referrer)
        .bind(&row.user_agent)
        .bind(&row.content_type)
        .bind(row.content_length)
        .bind(&row.created_at)
        .execute(&pool)
        .await
        .map_err(|_| RequestRepositoryError::StorageUnavailable)?;

        Ok(())
    }

    async fn list(
        &self,
        webhook_id: &str,
    ) -> Result<Vec<RequestSummaryRow>, RequestRepositoryError> {
        let pool = self.pool(webhook_id).await?;

        sqlx::query_as::<_, RequestSummaryRow>(
            "SELECT id, method, path, created_at
            FROM requests
            ORDER BY datetime(created_at) DESC",
        )
        .fetch_all(&pool)
        .await
        .map_err(|_| RequestRepositoryError::StorageUnavailable)
    }

    async fn find(
        &self,
        webhook_id: &str,
        request_id: &str,
    ) -> Result<Option<RequestRow>, RequestRepositoryError> {
        let pool = self.pool(webhook_id).await?;

        sqlx::query_as::<_, RequestRow>(
            "SELECT
                id, webhook_id, method, path, headers, query, query_string, body,
                ip, url, protocol, host, origin, referrer, user_agent,
                content_type, content_length, created_at
            FROM requests
            WHERE id = ?
            LIMIT 1",
        )
        .bind(request_id)
        .fetch_optional(&pool)
        .await
        .map_err(|_| RequestRepositoryError::StorageUnavailable)
    }

    async fn count(&self, webhook_id: &str) -> Result<i64, RequestRepositoryError> {
        let pool = self.pool(webhook_id).await?;

        sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM requests")
            .fetch_one(&pool)
            .await
            .map_err(|_| RequestRepositoryError::StorageUnavailable)
    }

    async fn exists(&self, webhook_id: &str) -> Result<bool, RequestRepositoryError> {
        Ok(self.manager.exists(webhook_id).await)
    }
}
