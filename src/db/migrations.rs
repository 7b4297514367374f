//! Database connection and schema management.

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use tracing::info;

/// Backing table for to-do items.
pub const TABLE_NAME: &str = "todo_items";

/// Declared columns other than the primary key, in table order.
///
/// Definitions must be valid for `ALTER TABLE ... ADD COLUMN`, so NOT NULL
/// columns carry a default.
const COLUMNS: &[(&str, &str)] = &[
    ("title", "TEXT NOT NULL DEFAULT ''"),
    ("status", "TEXT NOT NULL DEFAULT 'Doing'"),
    ("created_at", "TEXT"),
    ("updated_at", "TEXT"),
];

/// Open the database and make sure the item table matches the entity.
pub async fn init_db(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let pool = connect(database_url, max_connections).await?;
    ensure_schema(&pool).await?;

    info!("Database initialized successfully at {}", database_url);
    Ok(pool)
}

/// Open a connection pool without touching the schema.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .after_connect(|conn, _meta| Box::pin(async move { configure_pragmas_conn(conn).await }))
        .connect_with(options)
        .await
}

/// Create the item table if absent and add any declared column it lacks.
///
/// Columns are never dropped or retyped. Returns the names of the columns
/// that were added; an up-to-date table yields an empty list.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    info!("Ensuring schema for {}...", TABLE_NAME);

    let column_defs: Vec<String> = COLUMNS
        .iter()
        .map(|(name, def)| format!("{} {}", name, def))
        .collect();
    let create = format!(
        "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT, {})",
        TABLE_NAME,
        column_defs.join(", ")
    );
    sqlx::query(&create).execute(pool).await?;

    let existing = table_columns(pool).await?;
    let mut added = Vec::new();
    for (name, def) in COLUMNS {
        if existing.iter().any(|c| c == name) {
            continue;
        }
        let alter = format!("ALTER TABLE {} ADD COLUMN {} {}", TABLE_NAME, name, def);
        sqlx::query(&alter).execute(pool).await?;
        info!(table = TABLE_NAME, column = %name, "Added missing column");
        added.push(name.to_string());
    }

    info!("Schema is up to date");
    Ok(added)
}

/// Column names of the item table, in table order.
pub async fn table_columns(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query(&format!("PRAGMA table_info({})", TABLE_NAME))
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(|row| row.get::<String, _>("name")).collect())
}

async fn configure_pragmas_conn(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    // journal_mode returns the actual mode set; must use fetch to get result
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let journal_mode: String = row.get(0);
    tracing::debug!("SQLite journal_mode set to: {}", journal_mode);

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn db_url(temp_dir: &TempDir) -> (String, String) {
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        (format!("sqlite:{}", db_path), db_path)
    }

    #[tokio::test]
    async fn test_init_db_creates_database() {
        let temp_dir = TempDir::new().unwrap();
        let (url, db_path) = db_url(&temp_dir);

        let pool = init_db(&url, 2).await.expect("init_db failed");
        assert!(Path::new(&db_path).exists());

        let result: (i64,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    async fn test_schema_creates_item_table() {
        let temp_dir = TempDir::new().unwrap();
        let (url, _) = db_url(&temp_dir);
        let pool = init_db(&url, 2).await.expect("init_db failed");

        let result: (String,) = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name='todo_items'",
        )
        .fetch_one(&pool)
        .await
        .expect("query failed");
        assert_eq!(result.0, "todo_items");

        assert_eq!(
            table_columns(&pool).await.unwrap(),
            vec!["id", "title", "status", "created_at", "updated_at"]
        );
    }

    #[tokio::test]
    async fn test_ensure_schema_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let (url, _) = db_url(&temp_dir);
        let pool = init_db(&url, 2).await.expect("init_db failed");
        let before = table_columns(&pool).await.unwrap();

        let added = ensure_schema(&pool)
            .await
            .expect("second schema run failed");
        assert!(added.is_empty());
        assert_eq!(table_columns(&pool).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_ensure_schema_adds_missing_columns() {
        let temp_dir = TempDir::new().unwrap();
        let (url, _) = db_url(&temp_dir);
        let pool = connect(&url, 2).await.expect("connect failed");

        sqlx::query("CREATE TABLE todo_items (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO todo_items (title) VALUES ('legacy')")
            .execute(&pool)
            .await
            .unwrap();

        let added = ensure_schema(&pool).await.expect("ensure_schema failed");
        assert_eq!(added, vec!["status", "created_at", "updated_at"]);

        let row: (String, String, Option<String>) =
            sqlx::query_as("SELECT title, status, created_at FROM todo_items")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(row.0, "legacy");
        assert_eq!(row.1, "Doing");
        assert!(row.2.is_none());
    }

    #[tokio::test]
    async fn test_pragmas_configured() {
        let temp_dir = TempDir::new().unwrap();
        let (url, _) = db_url(&temp_dir);
        let pool = init_db(&url, 2).await.expect("init_db failed");

        let result: (i64,) = sqlx::query_as("PRAGMA busy_timeout")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(result.0, 5000);

        let result: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        // `journal_mode=WAL` is best-effort; SQLite can fall back depending on environment.
        assert!(
            matches!(result.0.as_str(), "wal" | "delete"),
            "unexpected journal_mode: {}",
            result.0
        );
    }

    #[tokio::test]
    async fn test_init_db_fails_for_unreachable_path() {
        let temp_dir = TempDir::new().unwrap();
        let url = format!(
            "sqlite:{}",
            temp_dir.path().join("missing").join("test.db").display()
        );
        assert!(init_db(&url, 1).await.is_err());
    }
}
