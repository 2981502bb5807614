use crate::core::data_type::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;

/// A single cell of a fetched result.
///
/// Temporal values come in two flavours: `TimestampNaive` carries no zone,
/// `Timestamp` is zone-aware and can be converted between zones.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum Value {
    Int(i64),
    Int32(i32),
    Float(f64),
    Float32(f32),
    String(String),
    Boolean(bool),
    Json(serde_json::Value),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    TimestampNaive(NaiveDateTime),
    Timestamp(DateTime<Tz>),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Int32(v) => Some(*v as i64),
            Value::Float(v) => float_to_i64(*v),
            Value::Float32(v) => float_to_i64(f64::from(*v)),
            Value::String(v) => v.trim().parse::<i64>().ok(),
            Value::Boolean(v) => Some(if *v { 1 } else { 0 }),
            Value::Json(v) => v.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Int32(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Float32(v) => Some(*v as f64),
            Value::String(v) => v.trim().parse::<f64>().ok(),
            Value::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Json(v) => v.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Int(v) => Some(*v != 0),
            Value::Int32(v) => Some(*v != 0),
            Value::Float(v) => Some(*v != 0.0),
            Value::Float32(v) => Some(*v != 0.0),
            Value::String(v) => match v.trim().to_lowercase().as_str() {
                "true" | "t" | "yes" | "1" => Some(true),
                "false" | "f" | "no" | "0" => Some(false),
                _ => None,
            },
            Value::Boolean(v) => Some(*v),
            Value::Json(v) => v.as_bool(),
            _ => None,
        }
    }

    /// The narrowest dtype able to hold this value on its own.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int(_) => DataType::Int64,
            Value::Int32(_) => DataType::Int32,
            Value::Float(_) => DataType::Float64,
            Value::Float32(_) => DataType::Float32,
            Value::String(_) => DataType::Object,
            Value::Boolean(_) => DataType::Boolean,
            Value::Json(_) => DataType::Json,
            Value::Bytes(_) => DataType::Bytes,
            Value::Date(_) => DataType::Date,
            Value::TimestampNaive(_) => DataType::Timestamp,
            Value::Timestamp(ts) => DataType::TimestampTz(ts.timezone()),
            Value::Null => DataType::Null,
        }
    }
}

/// `None` for non-finite floats and for floats outside the `i64` range.
fn float_to_i64(v: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    (v.is_finite() && v >= i64::MIN as f64 && v < i64::MAX as f64).then(|| v as i64)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Json(v) => write!(f, "{v}"),
            Value::Bytes(v) => {
                let hex = v
                    .iter()
                    .fold(String::new(), |acc, byte: &u8| acc + &format!("{byte:02x}"));
                write!(f, "\\x{hex}")
            }
            Value::Date(v) => write!(f, "{v}"),
            Value::TimestampNaive(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f")),
            Value::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f%:z")),
            Value::Null => write!(f, "NULL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_data_type_of_aware_timestamp_keeps_zone() {
        let ts = chrono_tz::UTC.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            Value::Timestamp(ts).data_type(),
            DataType::TimestampTz(chrono_tz::UTC)
        );
    }

    #[test]
    fn test_as_i64_rejects_non_finite_floats() {
        assert_eq!(Value::Float(f64::NAN).as_i64(), None);
        assert_eq!(Value::Float(3.0).as_i64(), Some(3));
        assert_eq!(Value::String(" 42 ".into()).as_i64(), Some(42));
    }

    #[test]
    fn test_as_i64_rejects_out_of_range_floats() {
        assert_eq!(Value::Float(1e20).as_i64(), None);
        assert_eq!(Value::Float(-1e30).as_i64(), None);
        assert_eq!(Value::Float(9.223372036854776e18).as_i64(), None);
        assert_eq!(Value::Float(-9.223372036854776e18).as_i64(), Some(i64::MIN));
        assert_eq!(Value::Float32(1e19).as_i64(), None);
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Bytes(vec![0xde, 0xad]).to_string(), "\\xdead");
        let ts = chrono_tz::America::Chicago
            .with_ymd_and_hms(2024, 1, 2, 6, 0, 0)
            .unwrap();
        assert_eq!(
            Value::Timestamp(ts).to_string(),
            "2024-01-02 06:00:00-06:00"
        );
    }
}
