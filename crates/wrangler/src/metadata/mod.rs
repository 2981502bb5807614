pub mod error;
pub mod extractor;
pub mod option_set;

pub use error::MetadataError;
pub use extractor::{END_MARKER, START_MARKER, extract, metadata_block, try_extract};
pub use option_set::{OptionCategory, OptionSet};
