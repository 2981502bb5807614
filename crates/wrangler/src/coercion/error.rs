use model::core::{data_type::DataType, error::FrameError};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoercionError {
    #[error("Column '{0}' is not in the result")]
    MissingColumn(String),

    #[error("Cannot cast value '{value}' in column '{column}' to {dtype}")]
    Cast {
        column: String,
        value: String,
        dtype: DataType,
    },
}

impl From<FrameError> for CoercionError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::MissingColumn(column) => CoercionError::MissingColumn(column),
        }
    }
}
