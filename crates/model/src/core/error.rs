use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DataTypeError {
    #[error("Unknown dtype: {0}")]
    UnknownDtype(String),

    #[error("Unknown timezone in dtype: {0}")]
    UnknownTimezone(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("Column not found: {0}")]
    MissingColumn(String),
}
