use crate::metadata::{error::MetadataError, option_set::OptionSet};
use tracing::{debug, warn};

pub const START_MARKER: &str = "/*pandas*";
pub const END_MARKER: &str = "*pandas*/";

/// Returns the text between the first start marker and the end marker that
/// follows it. A block without an end marker runs to the end of the text.
pub fn metadata_block(sql: &str) -> Option<&str> {
    let start = sql.find(START_MARKER)? + START_MARKER.len();
    let rest = &sql[start..];

    match rest.find(END_MARKER) {
        Some(end) => {
            let trailing = &rest[end + END_MARKER.len()..];
            if trailing.contains(START_MARKER) {
                warn!("Found more than one metadata block; only the first is used");
            }
            Some(&rest[..end])
        }
        None => {
            warn!("Metadata block has no closing '{END_MARKER}'; reading to the end of the query");
            Some(rest)
        }
    }
}

/// Parses the metadata block of `sql`. Text without a block yields an empty
/// option set; a block that is not valid TOML is an error.
pub fn try_extract(sql: &str) -> Result<OptionSet, MetadataError> {
    let Some(block) = metadata_block(sql) else {
        debug!("No metadata block in query");
        return Ok(OptionSet::new());
    };

    let table: toml::Table = toml::from_str(block)?;
    Ok(OptionSet::from_table(table))
}

/// Like [`try_extract`], but a malformed block is reported once as a warning
/// and treated as absent.
pub fn extract(sql: &str) -> OptionSet {
    match try_extract(sql) {
        Ok(options) => options,
        Err(err) => {
            warn!("No valid TOML metadata found in query: {err}");
            OptionSet::new()
        }
    }
}
