//! Repository layer for database operations.

use crate::domain::{NewItem, TodoItem};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

/// Repository for to-do item persistence.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Insert a validated item and return the id assigned by storage.
    ///
    /// `created_at` and `updated_at` are both stamped with the current time.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_item(&self, item: &NewItem) -> Result<i64, sqlx::Error> {
        let now = chrono::Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO todo_items (title, status, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(item.title())
        .bind(item.status())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Count all items.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn count_items(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM todo_items")
            .fetch_one(&self.pool)
            .await?;

        row.try_get("total")
    }

    /// Fetch one window of items, newest id first.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub async fn list_items(&self, offset: i64, limit: i64) -> Result<Vec<TodoItem>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, status, created_at, updated_at
            FROM todo_items
            ORDER BY id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(item_from_row).collect()
    }

    /// Fetch a single item by id.
    ///
    /// # Errors
    /// Returns an error if the query fails or the row cannot be decoded.
    pub async fn get_item(&self, id: i64) -> Result<Option<TodoItem>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, title, status, created_at, updated_at
            FROM todo_items
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(item_from_row).transpose()
    }

    /// Cheap round trip used by the readiness probe.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn item_from_row(row: &SqliteRow) -> Result<TodoItem, sqlx::Error> {
    Ok(TodoItem {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
