use crate::sql::base::error::{ConnectorError, DbError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// An existing file that is neither a credentials file nor a SQLite database.
    #[error("Cannot resolve connection spec '{}': detected content type '{mime}'", path.display())]
    UnresolvableSpec { path: PathBuf, mime: String },

    /// The connection string is neither an existing path nor a `scheme://` URL.
    #[error("Connection spec is not a path or URL: {0}")]
    InvalidSpec(String),

    /// Failed to read a credentials file.
    #[error("Failed to read connection spec file: {0}")]
    SpecRead(#[from] std::io::Error),

    /// Unsupported driver error.
    #[error("Unsupported driver: {0}")]
    UnsupportedDriver(String),

    /// Failed to initialize a connector.
    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),

    /// Database-related error.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}
