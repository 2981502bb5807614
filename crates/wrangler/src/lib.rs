pub mod coercion;
pub mod error;
pub mod metadata;
pub mod options;
pub mod reader;
pub mod timezone;
pub mod wrangler;

pub use error::WranglerError;
pub use metadata::{OptionCategory, OptionSet, extract, try_extract};
pub use options::{DtypeMap, EffectiveOptions, FetchOptions, IndexCol, ParseDates, QueryOptions};
pub use wrangler::DbWrangler;
