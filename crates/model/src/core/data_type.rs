use crate::core::{error::DataTypeError, value::Value};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, collections::HashMap, fmt, str::FromStr};

/// Column dtype of a fetched frame.
///
/// Names follow the dataframe vocabulary used inside embedded SQL metadata
/// (`int64`, `string`, `datetime64[ns, UTC]`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DataType {
    Int32,
    Int64,
    Float32,
    Float64,
    Boolean,
    String,
    Object,
    Bytes,
    Json,
    Date,
    /// Naive timestamp, `datetime64[ns]`.
    Timestamp,
    /// Zone-aware timestamp, `datetime64[ns, <zone>]`.
    TimestampTz(Tz),
    Null,
}

/// How a database driver reports a column, used to pick a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbColumnKind {
    Integer,
    SmallInteger,
    Real,
    Decimal,
    Text,
    Boolean,
    Json,
    Binary,
    Date,
    Timestamp,
    TimestampTz,
    Unknown,
}

lazy_static! {
    static ref DTYPE_ALIASES: HashMap<&'static str, DataType> = build_dtype_aliases();
    static ref DB_TYPE_MAP: HashMap<&'static str, DbColumnKind> = build_db_type_map();
}

const DATETIME_PREFIX: &str = "datetime64";

impl DataType {
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            DataType::Int32 => Cow::Borrowed("int32"),
            DataType::Int64 => Cow::Borrowed("int64"),
            DataType::Float32 => Cow::Borrowed("float32"),
            DataType::Float64 => Cow::Borrowed("float64"),
            DataType::Boolean => Cow::Borrowed("bool"),
            DataType::String => Cow::Borrowed("string"),
            DataType::Object => Cow::Borrowed("object"),
            DataType::Bytes => Cow::Borrowed("bytes"),
            DataType::Json => Cow::Borrowed("json"),
            DataType::Date => Cow::Borrowed("date"),
            DataType::Timestamp => Cow::Borrowed("datetime64[ns]"),
            DataType::TimestampTz(tz) => Cow::Owned(format!("datetime64[ns, {}]", tz.name())),
            DataType::Null => Cow::Borrowed("null"),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Int32 | DataType::Int64 | DataType::Float32 | DataType::Float64
        )
    }

    /// Infers a column dtype from fetched values, ignoring nulls.
    ///
    /// Mixed integer/float columns widen to `float64`; any other mix, or a
    /// text column, is `object`.
    pub fn infer(values: &[Value]) -> DataType {
        let mut inferred = DataType::Null;
        for value in values.iter().filter(|v| !v.is_null()) {
            let current = value.data_type();
            inferred = match (inferred, current) {
                (DataType::Null, current) => current,
                (prev, current) if prev == current => prev,
                (prev, current) if prev.is_numeric() && current.is_numeric() => {
                    Self::widen_numeric(&prev, &current)
                }
                _ => return DataType::Object,
            };
        }
        inferred
    }

    fn widen_numeric(a: &DataType, b: &DataType) -> DataType {
        match (a, b) {
            (DataType::Int32, DataType::Int64) | (DataType::Int64, DataType::Int32) => {
                DataType::Int64
            }
            _ => DataType::Float64,
        }
    }

    fn parse_datetime_dtype(name: &str) -> Result<Self, DataTypeError> {
        let rest = &name[DATETIME_PREFIX.len()..];
        if rest.is_empty() {
            return Ok(DataType::Timestamp);
        }

        let inner = rest
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .ok_or_else(|| DataTypeError::UnknownDtype(name.to_string()))?;

        match inner.split_once(',') {
            None => {
                Self::check_unit(inner, name)?;
                Ok(DataType::Timestamp)
            }
            Some((unit, zone)) => {
                Self::check_unit(unit.trim(), name)?;
                let zone = zone.trim();
                let tz = zone
                    .parse::<Tz>()
                    .map_err(|_| DataTypeError::UnknownTimezone(zone.to_string()))?;
                Ok(DataType::TimestampTz(tz))
            }
        }
    }

    fn check_unit(unit: &str, name: &str) -> Result<(), DataTypeError> {
        match unit {
            "s" | "ms" | "us" | "ns" => Ok(()),
            _ => Err(DataTypeError::UnknownDtype(name.to_string())),
        }
    }
}

impl FromStr for DataType {
    type Err = DataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with(DATETIME_PREFIX) {
            return Self::parse_datetime_dtype(trimmed);
        }

        DTYPE_ALIASES
            .get(trimmed)
            .or_else(|| DTYPE_ALIASES.get(trimmed.to_lowercase().as_str()))
            .cloned()
            .ok_or_else(|| DataTypeError::UnknownDtype(trimmed.to_string()))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl DbColumnKind {
    /// Maps a driver-reported column type name (SQLite declared type,
    /// Postgres or MySQL type name) to a decoder kind.
    pub fn from_db_type(type_name: &str) -> Self {
        let normalized = type_name.trim().to_uppercase();
        if let Some(kind) = DB_TYPE_MAP.get(normalized.as_str()) {
            return *kind;
        }

        // Declared types with modifiers, e.g. VARCHAR(45) or NUMERIC(10, 2)
        let base = normalized
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        if let Some(kind) = DB_TYPE_MAP.get(base.as_str()) {
            return *kind;
        }

        Self::from_affinity(&normalized)
    }

    // SQLite type affinity rules
    fn from_affinity(normalized: &str) -> Self {
        if normalized.contains("INT") {
            DbColumnKind::Integer
        } else if normalized.contains("CHAR")
            || normalized.contains("CLOB")
            || normalized.contains("TEXT")
        {
            DbColumnKind::Text
        } else if normalized.contains("BLOB") {
            DbColumnKind::Binary
        } else if normalized.contains("REAL")
            || normalized.contains("FLOA")
            || normalized.contains("DOUB")
        {
            DbColumnKind::Real
        } else {
            DbColumnKind::Unknown
        }
    }
}

fn build_dtype_aliases() -> HashMap<&'static str, DataType> {
    use DataType::*;

    let entries = [
        ("int64", Int64),
        ("Int64", Int64),
        ("int", Int64),
        ("integer", Int64),
        ("uint64", Int64),
        ("UInt64", Int64),
        ("uint32", Int64),
        ("UInt32", Int64),
        ("int32", Int32),
        ("Int32", Int32),
        ("int16", Int32),
        ("Int16", Int32),
        ("int8", Int32),
        ("Int8", Int32),
        ("uint16", Int32),
        ("UInt16", Int32),
        ("uint8", Int32),
        ("UInt8", Int32),
        ("float64", Float64),
        ("Float64", Float64),
        ("float", Float64),
        ("double", Float64),
        ("float32", Float32),
        ("Float32", Float32),
        ("bool", Boolean),
        ("boolean", Boolean),
        ("string", String),
        ("str", String),
        ("object", Object),
        ("O", Object),
        ("bytes", Bytes),
        ("json", Json),
        ("date", Date),
        ("datetime", Timestamp),
    ];

    let mut map = HashMap::new();
    for (name, data_type) in entries {
        map.insert(name, data_type);
    }
    map
}

fn build_db_type_map() -> HashMap<&'static str, DbColumnKind> {
    use DbColumnKind::*;

    let entries = [
        ("BOOLEAN", Boolean),
        ("BOOL", Boolean),
        ("TINYINT", SmallInteger),
        ("SMALLINT", SmallInteger),
        ("INT2", SmallInteger),
        ("MEDIUMINT", Integer),
        ("INT", Integer),
        ("INT4", Integer),
        ("INTEGER", Integer),
        ("BIGINT", Integer),
        ("INT8", Integer),
        ("YEAR", Integer),
        ("FLOAT", Real),
        ("FLOAT4", Real),
        ("REAL", Real),
        ("FLOAT8", Real),
        ("DOUBLE", Real),
        ("DOUBLE PRECISION", Real),
        ("NUMERIC", Decimal),
        ("DECIMAL", Decimal),
        ("NEWDECIMAL", Decimal),
        ("JSON", Json),
        ("JSONB", Json),
        ("TEXT", Text),
        ("TINYTEXT", Text),
        ("MEDIUMTEXT", Text),
        ("LONGTEXT", Text),
        ("NAME", Text),
        ("CHAR", Text),
        ("BPCHAR", Text),
        ("CHARACTER", Text),
        ("VARCHAR", Text),
        ("CHARACTER VARYING", Text),
        ("ENUM", Text),
        ("UUID", Text),
        ("BYTEA", Binary),
        ("BLOB", Binary),
        ("TINYBLOB", Binary),
        ("MEDIUMBLOB", Binary),
        ("LONGBLOB", Binary),
        ("BINARY", Binary),
        ("VARBINARY", Binary),
        ("DATE", Date),
        ("DATETIME", Timestamp),
        ("TIMESTAMP", Timestamp),
        ("TIMESTAMP WITHOUT TIME ZONE", Timestamp),
        ("TIMESTAMPTZ", TimestampTz),
        ("TIMESTAMP WITH TIME ZONE", TimestampTz),
    ];

    let mut map = HashMap::new();
    for (name, kind) in entries {
        map.insert(name, kind);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_dtypes() {
        assert_eq!("int64".parse::<DataType>().unwrap(), DataType::Int64);
        assert_eq!("Int64".parse::<DataType>().unwrap(), DataType::Int64);
        assert_eq!("string".parse::<DataType>().unwrap(), DataType::String);
        assert_eq!("BOOLEAN".parse::<DataType>().unwrap(), DataType::Boolean);
        assert_eq!(" float32 ".parse::<DataType>().unwrap(), DataType::Float32);
    }

    #[test]
    fn test_parse_datetime_dtypes() {
        assert_eq!(
            "datetime64[ns]".parse::<DataType>().unwrap(),
            DataType::Timestamp
        );
        assert_eq!(
            "datetime64[ns, UTC]".parse::<DataType>().unwrap(),
            DataType::TimestampTz(chrono_tz::UTC)
        );
        assert_eq!(
            "datetime64[us, America/Chicago]"
                .parse::<DataType>()
                .unwrap(),
            DataType::TimestampTz(chrono_tz::America::Chicago)
        );
    }

    #[test]
    fn test_parse_unknown_dtype() {
        assert!(matches!(
            "decimal128".parse::<DataType>(),
            Err(DataTypeError::UnknownDtype(_))
        ));
        assert!(matches!(
            "datetime64[ns, Mars/Olympus]".parse::<DataType>(),
            Err(DataTypeError::UnknownTimezone(_))
        ));
        assert!(matches!(
            "datetime64[fortnights]".parse::<DataType>(),
            Err(DataTypeError::UnknownDtype(_))
        ));
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        let tz = DataType::TimestampTz(chrono_tz::Europe::Berlin);
        assert_eq!(tz.name(), "datetime64[ns, Europe/Berlin]");
        assert_eq!(tz.name().parse::<DataType>().unwrap(), tz);
    }

    #[test]
    fn test_infer_widens_and_ignores_nulls() {
        let ints = vec![Value::Null, Value::Int(1), Value::Int32(2)];
        assert_eq!(DataType::infer(&ints), DataType::Int64);

        let mixed = vec![Value::Int(1), Value::Float(2.5)];
        assert_eq!(DataType::infer(&mixed), DataType::Float64);

        let objects = vec![Value::Int(1), Value::String("a".into())];
        assert_eq!(DataType::infer(&objects), DataType::Object);

        assert_eq!(DataType::infer(&[Value::Null]), DataType::Null);
    }

    #[test]
    fn test_db_column_kind_lookup() {
        assert_eq!(DbColumnKind::from_db_type("integer"), DbColumnKind::Integer);
        assert_eq!(
            DbColumnKind::from_db_type("VARCHAR(45)"),
            DbColumnKind::Text
        );
        assert_eq!(
            DbColumnKind::from_db_type("timestamptz"),
            DbColumnKind::TimestampTz
        );
        assert_eq!(
            DbColumnKind::from_db_type("UNSIGNED BIG INT"),
            DbColumnKind::Integer
        );
        assert_eq!(
            DbColumnKind::from_db_type("something odd"),
            DbColumnKind::Unknown
        );
    }
}
