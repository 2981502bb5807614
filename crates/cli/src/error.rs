use connectors::{error::AdapterError, sql::base::error::DbError};
use thiserror::Error;
use wrangler::{WranglerError, options::OptionError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read or write a file: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Wrangler(#[from] WranglerError),

    #[error("Invalid option: {0}")]
    Options(#[from] OptionError),

    #[error("Connection failed: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    #[error("Either --sql or --file is required")]
    MissingSql,

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Shutdown requested")]
    ShutdownRequested,
}
