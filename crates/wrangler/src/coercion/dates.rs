use crate::{
    options::{DateColumn, DateFormat, EpochUnit, ParseDates},
    timezone::convert_column,
};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use model::{
    core::{data_type::DataType, value::Value},
    records::{column::Column, frame::Frame},
};
use tracing::debug;

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// A timestamp read from text, with or without an offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedTimestamp {
    Aware(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

/// Reads the common ISO-like layouts. Date-only text is midnight.
pub fn parse_timestamp(raw: &str) -> Option<ParsedTimestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ParsedTimestamp::Aware(ts));
    }
    if let Some(ts) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(ParsedTimestamp::Aware(ts));
    }
    if let Some(ts) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(ParsedTimestamp::Naive(ts));
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|date| ParsedTimestamp::Naive(date.and_time(NaiveTime::MIN)))
}

/// Reads `raw` with one strftime pattern. Patterns without an offset give
/// naive values; patterns without a time give midnight.
pub fn parse_with_format(raw: &str, format: &str) -> Option<ParsedTimestamp> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_str(raw, format) {
        return Some(ParsedTimestamp::Aware(ts));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
        return Some(ParsedTimestamp::Naive(ts));
    }
    NaiveDate::parse_from_str(raw, format)
        .ok()
        .map(|date| ParsedTimestamp::Naive(date.and_time(NaiveTime::MIN)))
}

pub fn from_epoch(value: i64, unit: EpochUnit) -> Option<NaiveDateTime> {
    value
        .checked_mul(unit.nanos())
        .map(|nanos| DateTime::from_timestamp_nanos(nanos).naive_utc())
}

pub fn from_epoch_float(value: f64, unit: EpochUnit) -> Option<NaiveDateTime> {
    let nanos = value * unit.nanos() as f64;
    if !nanos.is_finite() || nanos.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(DateTime::from_timestamp_nanos(nanos.round() as i64).naive_utc())
}

enum Parsed {
    Naive(NaiveDateTime),
    Aware(DateTime<Utc>),
}

impl From<ParsedTimestamp> for Parsed {
    fn from(ts: ParsedTimestamp) -> Self {
        match ts {
            ParsedTimestamp::Aware(ts) => Parsed::Aware(ts.with_timezone(&Utc)),
            ParsedTimestamp::Naive(ts) => Parsed::Naive(ts),
        }
    }
}

/// Converts the listed columns to timestamps. Values that cannot be read
/// become null; columns missing from the frame are skipped. Afterwards every
/// zone-aware data column is expressed in UTC.
pub fn parse_date_columns(frame: &mut Frame, parse_dates: Option<&ParseDates>) {
    if let Some(dates) = parse_dates {
        for date in dates.iter() {
            match frame.column_mut(&date.column) {
                Some(column) => parse_column(column, date),
                None => debug!("Date column '{}' is not in the result; skipping", date.column),
            }
        }
    }

    for column in frame.columns.iter_mut() {
        if matches!(column.data_type, DataType::TimestampTz(tz) if tz != chrono_tz::UTC) {
            convert_column(column, chrono_tz::UTC);
        }
    }
}

fn parse_column(column: &mut Column, date: &DateColumn) {
    let parsed: Vec<Option<Parsed>> = column
        .values
        .iter()
        .map(|value| parse_value(value, &date.format))
        .collect();

    let failed = column
        .values
        .iter()
        .zip(&parsed)
        .filter(|(value, parsed)| !value.is_null() && parsed.is_none())
        .count();
    if failed > 0 {
        debug!(
            "{failed} values of '{}' could not be read as dates and are null",
            column.name
        );
    }

    let aware = date.utc || parsed.iter().any(|p| matches!(p, Some(Parsed::Aware(_))));
    column.values = parsed
        .into_iter()
        .map(|p| match p {
            None => Value::Null,
            Some(Parsed::Aware(ts)) => Value::Timestamp(ts.with_timezone(&chrono_tz::UTC)),
            Some(Parsed::Naive(ts)) if aware => {
                Value::Timestamp(chrono_tz::UTC.from_utc_datetime(&ts))
            }
            Some(Parsed::Naive(ts)) => Value::TimestampNaive(ts),
        })
        .collect();
    column.data_type = if aware {
        DataType::TimestampTz(chrono_tz::UTC)
    } else {
        DataType::Timestamp
    };
}

fn parse_value(value: &Value, format: &DateFormat) -> Option<Parsed> {
    match value {
        Value::Null | Value::Boolean(_) | Value::Json(_) | Value::Bytes(_) => None,
        Value::TimestampNaive(ts) => Some(Parsed::Naive(*ts)),
        Value::Timestamp(ts) => Some(Parsed::Aware(ts.with_timezone(&Utc))),
        Value::Date(date) => Some(Parsed::Naive(date.and_time(NaiveTime::MIN))),
        Value::Int(_) | Value::Int32(_) | Value::Float(_) | Value::Float32(_) => match format {
            DateFormat::Infer => parse_number(value, EpochUnit::Seconds),
            DateFormat::Unit(unit) => parse_number(value, *unit),
            DateFormat::Strftime(fmt) => parse_with_format(&value.to_string(), fmt).map(Into::into),
        },
        Value::String(raw) => match format {
            DateFormat::Infer => parse_timestamp(raw).map(Into::into),
            DateFormat::Unit(unit) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|n| from_epoch_float(n, *unit))
                .map(Parsed::Naive),
            DateFormat::Strftime(fmt) => parse_with_format(raw, fmt).map(Into::into),
        },
    }
}

fn parse_number(value: &Value, unit: EpochUnit) -> Option<Parsed> {
    let naive = match value {
        Value::Int(v) => from_epoch(*v, unit),
        Value::Int32(v) => from_epoch(i64::from(*v), unit),
        other => other.as_f64().and_then(|v| from_epoch_float(v, unit)),
    };
    naive.map(Parsed::Naive)
}
