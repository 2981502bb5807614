pub mod error;
pub mod merge;
pub mod values;

pub use error::OptionError;
pub use merge::{EffectiveOptions, FetchOptions, QueryOptions, merge};
pub use values::{DateColumn, DateFormat, DtypeMap, EpochUnit, IndexCol, OptionValue, ParseDates, Timezone};
