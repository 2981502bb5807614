use crate::{coercion::CoercionError, options::OptionError, timezone::TimezoneError};
use connectors::{error::AdapterError, sql::base::error::DbError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WranglerError {
    #[error("No database connection configured")]
    NotConnected,

    #[error("Failed to read SQL file '{path}': {source}")]
    SqlFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Option error: {0}")]
    Options(#[from] OptionError),

    #[error("Coercion error: {0}")]
    Coercion(#[from] CoercionError),

    #[error("Timezone error: {0}")]
    Timezone(#[from] TimezoneError),
}
