use crate::sql::base::{
    adapter::{DatabaseKind, SqlAdapter},
    error::DbError,
    row::DbRow,
};
use async_trait::async_trait;
use model::records::row_set::RowSet;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads from a local SQLite database file. The file is opened read-only for
/// each query.
#[derive(Debug, Clone)]
pub struct SqliteAdapter {
    path: PathBuf,
}

impl SqliteAdapter {
    pub fn new(path: &Path) -> Self {
        SqliteAdapter {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SqlAdapter for SqliteAdapter {
    async fn query_rows(&self, sql: &str) -> Result<RowSet, DbError> {
        let path = self.path.clone();
        let sql = sql.to_string();
        tokio::task::spawn_blocking(move || read_rows(&path, &sql)).await?
    }

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Sqlite
    }
}

fn read_rows(path: &Path, sql: &str) -> Result<RowSet, DbError> {
    debug!("Opening SQLite database '{}'", path.display());
    let mut conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    // Dropping an uncommitted transaction rolls it back.
    let tx = conn.transaction()?;
    let rows = collect_rows(&tx, sql)?;
    tx.commit()?;

    debug!("Fetched {} rows from SQLite", rows.len());
    Ok(rows)
}

fn collect_rows(conn: &Connection, sql: &str) -> Result<RowSet, DbError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut result = RowSet::new(columns.clone());
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        result.push(DbRow::SqliteRow(row).values(&columns)?);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::value::Value;
    use tempfile::NamedTempFile;

    fn seeded_db() -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let conn = Connection::open(file.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE users (user_id INTEGER, name TEXT, score REAL, avatar BLOB);
             INSERT INTO users VALUES (7, 'ann', 1.5, x'0102');
             INSERT INTO users VALUES (8, NULL, NULL, NULL);",
        )
        .unwrap();
        file
    }

    #[tokio::test]
    async fn test_query_rows_decodes_storage_classes() {
        let file = seeded_db();
        let adapter = SqliteAdapter::new(file.path());

        let rows = adapter
            .query_rows("SELECT user_id, name, score, avatar FROM users ORDER BY user_id")
            .await
            .unwrap();

        assert_eq!(rows.columns, vec!["user_id", "name", "score", "avatar"]);
        assert_eq!(
            rows.rows[0],
            vec![
                Value::Int(7),
                Value::String("ann".into()),
                Value::Float(1.5),
                Value::Bytes(vec![1, 2]),
            ]
        );
        assert_eq!(rows.rows[1][1], Value::Null);
    }

    #[tokio::test]
    async fn test_empty_result_keeps_columns() {
        let file = seeded_db();
        let adapter = SqliteAdapter::new(file.path());

        let rows = adapter
            .query_rows("SELECT user_id FROM users WHERE user_id > 100")
            .await
            .unwrap();

        assert_eq!(rows.columns, vec!["user_id"]);
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_bad_sql_propagates_driver_error() {
        let file = seeded_db();
        let adapter = SqliteAdapter::new(file.path());

        let err = adapter.query_rows("SELECT nope FROM users").await.unwrap_err();
        assert!(matches!(err, DbError::Sqlite(_)));
    }

    #[tokio::test]
    async fn test_ping() {
        let file = seeded_db();
        SqliteAdapter::new(file.path()).ping().await.unwrap();
    }
}
