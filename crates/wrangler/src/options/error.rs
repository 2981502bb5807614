use crate::metadata::OptionCategory;
use model::core::error::DataTypeError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum OptionError {
    #[error("Invalid '{category}' option: {message}")]
    InvalidValue {
        category: OptionCategory,
        message: String,
    },

    #[error("Invalid dtype for column '{column}': {source}")]
    Dtype {
        column: String,
        source: DataTypeError,
    },

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),
}

impl OptionError {
    pub(crate) fn invalid(category: OptionCategory, message: impl Into<String>) -> Self {
        OptionError::InvalidValue {
            category,
            message: message.into(),
        }
    }
}
