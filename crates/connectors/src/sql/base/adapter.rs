use crate::sql::base::error::DbError;
use async_trait::async_trait;
use model::records::row_set::RowSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseKind {
    Sqlite,
    MySql,
    Postgres,
}

/// A read-only query endpoint.
///
/// Every call acquires its own connection, runs the statement inside a
/// transaction and releases the connection before returning, whether the
/// query succeeded or not.
#[async_trait]
pub trait SqlAdapter {
    async fn query_rows(&self, sql: &str) -> Result<RowSet, DbError>;

    async fn ping(&self) -> Result<(), DbError> {
        self.query_rows("SELECT 1").await.map(|_| ())
    }

    fn kind(&self) -> DatabaseKind;
}
