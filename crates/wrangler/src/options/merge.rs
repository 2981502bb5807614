use crate::{
    metadata::{OptionCategory, OptionSet},
    options::{
        error::OptionError,
        values::{DtypeMap, IndexCol, OptionValue, ParseDates, Timezone},
    },
};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

/// Options a caller passes to a single fetch. Unset or empty fields fall back
/// to the query's metadata block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOptions {
    pub index_col: Option<IndexCol>,
    pub parse_dates: Option<ParseDates>,
    pub dtype: Option<DtypeMap>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index_col(mut self, index_col: impl Into<IndexCol>) -> Self {
        self.index_col = Some(index_col.into());
        self
    }

    pub fn parse_dates(mut self, parse_dates: ParseDates) -> Self {
        self.parse_dates = Some(parse_dates);
        self
    }

    pub fn dtype(mut self, dtype: DtypeMap) -> Self {
        self.dtype = Some(dtype);
        self
    }
}

/// Options handed to the frame reader. The timezone is applied after the
/// read and has no place here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryOptions {
    pub index_col: Option<IndexCol>,
    pub parse_dates: Option<ParseDates>,
    pub dtype: Option<DtypeMap>,
}

/// Everything that shaped the most recent fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveOptions {
    pub sql: String,
    pub query: QueryOptions,
    pub timezone: Option<Tz>,
}

/// Combines caller options with the options extracted from `sql`, field by
/// field. A non-empty caller value always wins.
pub fn merge(
    sql: &str,
    mut extracted: OptionSet,
    overrides: FetchOptions,
) -> Result<EffectiveOptions, OptionError> {
    let timezone = extracted
        .remove(OptionCategory::Timezone)
        .map(|value| Timezone::from_toml(&value))
        .transpose()?
        .map(|tz| tz.0);

    let query = QueryOptions {
        index_col: resolve(overrides.index_col, &extracted)?,
        parse_dates: resolve(overrides.parse_dates, &extracted)?,
        dtype: resolve(overrides.dtype, &extracted)?,
    };

    Ok(EffectiveOptions {
        sql: sql.to_string(),
        query,
        timezone,
    })
}

fn resolve<T: OptionValue>(
    explicit: Option<T>,
    extracted: &OptionSet,
) -> Result<Option<T>, OptionError> {
    if let Some(value) = explicit.filter(|v| !v.is_empty()) {
        debug!("Using caller supplied '{}'", T::CATEGORY);
        return Ok(Some(value));
    }

    let Some(raw) = extracted.get(T::CATEGORY) else {
        return Ok(None);
    };
    debug!("Using '{}' from query metadata", T::CATEGORY);
    let value = T::from_toml(raw)?;
    Ok((!value.is_empty()).then_some(value))
}
