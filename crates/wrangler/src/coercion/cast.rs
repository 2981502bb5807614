use crate::{
    coercion::{
        dates::{ParsedTimestamp, from_epoch, parse_timestamp},
        error::CoercionError,
    },
    options::{DtypeMap, EpochUnit},
};
use chrono::{NaiveTime, TimeZone};
use model::{
    core::{data_type::DataType, value::Value},
    records::{column::Column, frame::Frame},
};
use tracing::debug;

/// Casts the named columns. Every named column must exist; nulls survive
/// any cast.
pub fn apply_dtypes(frame: &mut Frame, dtype: &DtypeMap) -> Result<(), CoercionError> {
    if let Some((missing, _)) = dtype.iter().find(|(c, _)| frame.column(c).is_none()) {
        return Err(CoercionError::MissingColumn(missing.to_string()));
    }

    for (name, target) in dtype.iter() {
        if let Some(column) = frame.column_mut(name) {
            debug!("Casting '{name}' from {} to {target}", column.data_type);
            cast_column(column, target)?;
        }
    }
    Ok(())
}

pub fn cast_column(column: &mut Column, target: &DataType) -> Result<(), CoercionError> {
    let values = column
        .values
        .iter()
        .map(|value| {
            cast_value(value, target).ok_or_else(|| CoercionError::Cast {
                column: column.name.clone(),
                value: value.to_string(),
                dtype: target.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    column.values = values;
    column.data_type = target.clone();
    Ok(())
}

/// Converts one value, or `None` when it has no representation in `target`.
///
/// Integers cast to timestamps count nanoseconds from the epoch. Naive
/// timestamps never become zone-aware through a cast, nor the reverse.
pub fn cast_value(value: &Value, target: &DataType) -> Option<Value> {
    if value.is_null() {
        return Some(Value::Null);
    }

    match target {
        DataType::Object => Some(value.clone()),
        DataType::Null => None,
        DataType::Int64 => match value {
            Value::TimestampNaive(ts) => ts.and_utc().timestamp_nanos_opt().map(Value::Int),
            Value::Timestamp(ts) => ts.timestamp_nanos_opt().map(Value::Int),
            other => other.as_i64().map(Value::Int),
        },
        DataType::Int32 => value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::Int32),
        DataType::Float64 => value.as_f64().map(Value::Float),
        DataType::Float32 => value.as_f64().map(|v| Value::Float32(v as f32)),
        DataType::Boolean => value.as_bool().map(Value::Boolean),
        DataType::String => Some(Value::String(match value {
            Value::String(s) => s.clone(),
            Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            other => other.to_string(),
        })),
        DataType::Bytes => match value {
            Value::Bytes(bytes) => Some(Value::Bytes(bytes.clone())),
            Value::String(s) => Some(Value::Bytes(s.as_bytes().to_vec())),
            _ => None,
        },
        DataType::Json => match value {
            Value::Json(json) => Some(Value::Json(json.clone())),
            Value::String(s) => serde_json::from_str(s).ok().map(Value::Json),
            Value::Int(v) => Some(Value::Json((*v).into())),
            Value::Int32(v) => Some(Value::Json((*v).into())),
            Value::Float(v) => serde_json::Number::from_f64(*v).map(|n| Value::Json(n.into())),
            Value::Float32(v) => {
                serde_json::Number::from_f64(f64::from(*v)).map(|n| Value::Json(n.into()))
            }
            Value::Boolean(v) => Some(Value::Json((*v).into())),
            _ => None,
        },
        DataType::Date => match value {
            Value::Date(date) => Some(Value::Date(*date)),
            Value::TimestampNaive(ts) => Some(Value::Date(ts.date())),
            Value::Timestamp(ts) => Some(Value::Date(ts.date_naive())),
            Value::String(s) => parse_timestamp(s).map(|ts| match ts {
                ParsedTimestamp::Aware(ts) => Value::Date(ts.date_naive()),
                ParsedTimestamp::Naive(ts) => Value::Date(ts.date()),
            }),
            _ => None,
        },
        DataType::Timestamp => match value {
            Value::TimestampNaive(ts) => Some(Value::TimestampNaive(*ts)),
            Value::Date(date) => Some(Value::TimestampNaive(date.and_time(NaiveTime::MIN))),
            Value::String(s) => parse_timestamp(s).map(|ts| match ts {
                ParsedTimestamp::Aware(ts) => Value::TimestampNaive(ts.naive_utc()),
                ParsedTimestamp::Naive(ts) => Value::TimestampNaive(ts),
            }),
            Value::Int(v) => from_epoch(*v, EpochUnit::Nanos).map(Value::TimestampNaive),
            Value::Int32(v) => {
                from_epoch(i64::from(*v), EpochUnit::Nanos).map(Value::TimestampNaive)
            }
            _ => None,
        },
        DataType::TimestampTz(tz) => match value {
            Value::Timestamp(ts) => Some(Value::Timestamp(ts.with_timezone(tz))),
            Value::String(s) => match parse_timestamp(s)? {
                ParsedTimestamp::Aware(ts) => Some(Value::Timestamp(ts.with_timezone(tz))),
                // localized; ambiguous or skipped local times fail
                ParsedTimestamp::Naive(ts) => tz.from_local_datetime(&ts).single().map(Value::Timestamp),
            },
            Value::Int(v) => from_epoch(*v, EpochUnit::Nanos)
                .map(|ts| Value::Timestamp(tz.from_utc_datetime(&ts))),
            Value::Int32(v) => from_epoch(i64::from(*v), EpochUnit::Nanos)
                .map(|ts| Value::Timestamp(tz.from_utc_datetime(&ts))),
            _ => None,
        },
    }
}
