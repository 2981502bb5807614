use thiserror::Error;

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLite driver error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// PostgreSQL driver error.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// MySQL driver error.
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// The connection for this query could not be opened.
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectorError),

    /// A blocking query task panicked or was cancelled.
    #[error("Query task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A column value could not be decoded into a frame value.
    #[error("Failed to decode column '{column}': {message}")]
    Decode { column: String, message: String },
}

/// Errors happening during connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("PostgreSQL connection failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("MySQL connection failed: {0}")]
    MySql(#[from] mysql_async::Error),
}
