use crate::infrastructure::db::dto::ResponseRuleRow;
use crate::infrastructure::db::sqlite::manager::WebhookDatabaseManager;
use crate::infrastructure::db::stores::response_rule_store::{
    ResponseRuleRepositoryError, ResponseRuleStore,
};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS response_rules (
        id TEXT PRIMARY KEY,
        webhook_id TEXT NOT NULL,
        method TEXT NOT NULL,
        sub_path TEXT NOT NULL,
        status INTEGER NOT NULL,
        content_type TEXT,
        body TEXT,
        position INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
";

const CREATE_INDEX_SQL: &str = "
    CREATE INDEX IF NOT EXISTS idx_response_rules_webhook
    ON response_rules(webhook_id, position ASC)
";

#[derive(Clone)]
pub struct ResponseRuleStoreSqlite {
    manager: Arc<WebhookDatabaseManager>,
}

impl ResponseRuleStoreSqlite {
    /// Build a SQLite-backed response-rule store over the shared database
    /// manager.
    pub fn new(manager: Arc<WebhookDatabaseManager>) -> Self {
        Self { manager }
    }

    async fn pool(&self, webhook_id: &str) -> Result<SqlitePool, ResponseRuleRepositoryError> {
        let pool = self.manager.get_or_open(webhook_id).await?;

        sqlx::query(CREATE_TABLE_SQL)
            .execute(&pool)
            .await
            .map_err(|_| ResponseRuleRepositoryError::StorageUnavailable)?;
        sqlx::query(CREATE_INDEX_SQL)
            .execute(&pool)
            .await
            .map_err(|_| ResponseRuleRepositoryError::StorageUnavailable)?;

        Ok(pool)
    }
}

#[async_trait]
impl ResponseRuleStore for ResponseRuleStoreSqlite {
    async fn prepare(&self, webhook_id: &str) -> Result<(), ResponseRuleRepositoryError> {
        self.pool(webhook_id).await?;
        Ok(())
    }

    async fn list(
        &self,
        webhook_id: &str,
    ) -> Result<Vec<ResponseRuleRow>, ResponseRuleRepositoryError> {
        let pool = self.pool(webhook_id).await?;

        sqlx::query_as::<_, ResponseRuleRow>(
            "SELECT
                id, webhook_id, method, sub_path, status, content_type, body,
                position, created_at, updated_at
            FROM response_rules
            WHERE webhook_id = ?
            ORDER BY position ASC",
        )
        .bind(webhook_id)
        .fetch_all(&pool)
        .await
        .map_err(|_| ResponseRuleRepositoryError::StorageUnavailable)
    }

    async fn replace_all(
        &self,
        webhook_id: &str,
        rows: &[ResponseRuleRow],
    ) -> Result<(), ResponseRuleRepositoryError> {
        let pool = self.pool(webhook_id).await?;

        let mut tx = pool
            .begin()
            .await
            .map_err(|_| ResponseRuleRepositoryError::StorageUnavailable)?;

        sqlx::query("DELETE FROM response_rules WHERE webhook_id = ?")
            .bind(webhook_id)
            .execute(&mut *tx)
            .await
            .map_err(|_| ResponseRuleRepositoryError::StorageUnavailable)?;

        for row in rows {
            sqlx::query(
                "INSERT INTO response_rules (
                    id, webhook_id, method, sub_path, status, content_type, body,
                    position, created_at, updated_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&row.id)
            .bind(&row.webhook_id)
            .bind(&row.method)
            .bind(&row.sub_path)
            .bind(row.status)
            .bind(&row.content_type)
            .bind(&row.body)
            .bind(row.position)
            .bind(&row.created_at)
            .bind(&row.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|_| ResponseRuleRepositoryError::StorageUnavailable)?;
        }

        tx.commit()
            .await
            .map_err(|_| ResponseRuleRepositoryError::StorageUnavailable)
    }
}
