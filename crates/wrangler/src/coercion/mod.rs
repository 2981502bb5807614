pub mod cast;
pub mod dates;
pub mod error;

pub use error::CoercionError;

use crate::options::QueryOptions;
use model::records::frame::Frame;
use tracing::debug;

/// Shapes a freshly fetched frame: dtype casts first, then date parsing
/// (which also normalises zone-aware columns to UTC), then the index.
pub fn apply(mut frame: Frame, options: &QueryOptions) -> Result<Frame, CoercionError> {
    if let Some(dtype) = &options.dtype {
        cast::apply_dtypes(&mut frame, dtype)?;
    }

    dates::parse_date_columns(&mut frame, options.parse_dates.as_ref());

    if let Some(index_col) = &options.index_col {
        debug!("Setting index to {:?}", index_col.columns());
        frame.set_index(index_col.columns())?;
    }
    Ok(frame)
}
