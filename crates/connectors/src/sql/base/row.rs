use crate::sql::{base::error::DbError, mysql::data_type::mysql_column_kind};
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use model::core::{data_type::DbColumnKind, value::Value};
use mysql_async::{Row as MySqlRow, prelude::FromValue};
use rusqlite::{Row as SqliteRow, types::ValueRef};
use tokio_postgres::{Row as PgRow, types::Json as PgJson};
use tracing::warn;

pub enum DbRow<'a> {
    SqliteRow(&'a SqliteRow<'a>),
    MySqlRow(&'a MySqlRow),
    PostgresRow(&'a PgRow),
}

impl DbRow<'_> {
    /// Decodes every cell of the row, in column order.
    pub fn values(&self, columns: &[String]) -> Result<Vec<Value>, DbError> {
        columns
            .iter()
            .enumerate()
            .map(|(idx, name)| self.get_value(idx, name))
            .collect()
    }

    pub fn get_value(&self, idx: usize, name: &str) -> Result<Value, DbError> {
        match self {
            DbRow::SqliteRow(row) => sqlite_value(row, idx),
            DbRow::MySqlRow(row) => {
                let kind = row
                    .columns_ref()
                    .get(idx)
                    .map(mysql_column_kind)
                    .unwrap_or(DbColumnKind::Unknown);
                mysql_value(row, idx, name, kind)
            }
            DbRow::PostgresRow(row) => {
                let kind = row
                    .columns()
                    .get(idx)
                    .map(|col| DbColumnKind::from_db_type(col.type_().name()))
                    .unwrap_or(DbColumnKind::Unknown);
                pg_value(row, idx, name, kind)
            }
        }
    }
}

fn sqlite_value(row: &SqliteRow<'_>, idx: usize) -> Result<Value, DbError> {
    // SQLite values carry their storage class; declared column types are not
    // applied so that text dates stay text until parse_dates handles them.
    let value = match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Int(v),
        ValueRef::Real(v) => Value::Float(v),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec()),
    };
    Ok(value)
}

fn pg_value(row: &PgRow, idx: usize, name: &str, kind: DbColumnKind) -> Result<Value, DbError> {
    let value = match kind {
        DbColumnKind::Integer | DbColumnKind::SmallInteger => row
            .try_get::<_, Option<i64>>(idx)
            .or_else(|_| row.try_get::<_, Option<i32>>(idx).map(|v| v.map(i64::from)))
            .or_else(|_| row.try_get::<_, Option<i16>>(idx).map(|v| v.map(i64::from)))?
            .map(Value::Int),
        DbColumnKind::Real => row
            .try_get::<_, Option<f64>>(idx)
            .or_else(|_| row.try_get::<_, Option<f32>>(idx).map(|v| v.map(f64::from)))?
            .map(Value::Float),
        DbColumnKind::Decimal => row
            .try_get::<_, Option<rust_decimal::Decimal>>(idx)?
            .map(|v| decimal_to_float(v.to_f64(), name))
            .transpose()?,
        DbColumnKind::Text => row
            .try_get::<_, Option<String>>(idx)
            .or_else(|_| {
                row.try_get::<_, Option<uuid::Uuid>>(idx)
                    .map(|v| v.map(|u| u.to_string()))
            })?
            .map(Value::String),
        DbColumnKind::Boolean => row.try_get::<_, Option<bool>>(idx)?.map(Value::Boolean),
        DbColumnKind::Json => row
            .try_get::<_, Option<PgJson<serde_json::Value>>>(idx)?
            .map(|json| Value::Json(json.0)),
        DbColumnKind::Binary => row.try_get::<_, Option<Vec<u8>>>(idx)?.map(Value::Bytes),
        DbColumnKind::Date => row.try_get::<_, Option<NaiveDate>>(idx)?.map(Value::Date),
        DbColumnKind::Timestamp => row
            .try_get::<_, Option<NaiveDateTime>>(idx)?
            .map(Value::TimestampNaive),
        DbColumnKind::TimestampTz => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)?
            .map(|ts| Value::Timestamp(ts.with_timezone(&chrono_tz::UTC))),
        DbColumnKind::Unknown => match row.try_get::<_, Option<String>>(idx) {
            Ok(v) => v.map(Value::String),
            Err(err) => {
                let type_name = row
                    .columns()
                    .get(idx)
                    .map(|c| c.type_().name().to_string())
                    .unwrap_or_default();
                warn!("Cannot decode Postgres column '{name}' of type {type_name}");
                return Err(DbError::Decode {
                    column: name.to_string(),
                    message: format!("unsupported type {type_name}: {err}"),
                });
            }
        },
    };
    Ok(value.unwrap_or(Value::Null))
}

fn mysql_value(
    row: &MySqlRow,
    idx: usize,
    name: &str,
    kind: DbColumnKind,
) -> Result<Value, DbError> {
    let value = match kind {
        DbColumnKind::Integer | DbColumnKind::SmallInteger => {
            mysql_get::<i64>(row, idx, name)?.map(Value::Int)
        }
        DbColumnKind::Real => mysql_get::<f64>(row, idx, name)?.map(Value::Float),
        DbColumnKind::Decimal => mysql_get::<BigDecimal>(row, idx, name)?
            .map(|v| decimal_to_float(v.to_f64(), name))
            .transpose()?,
        DbColumnKind::Boolean => mysql_get::<bool>(row, idx, name)?.map(Value::Boolean),
        DbColumnKind::Json => match mysql_get::<String>(row, idx, name)? {
            Some(raw) => Some(Value::Json(serde_json::from_str(&raw).map_err(|e| {
                DbError::Decode {
                    column: name.to_string(),
                    message: e.to_string(),
                }
            })?)),
            None => None,
        },
        DbColumnKind::Binary => mysql_get::<Vec<u8>>(row, idx, name)?.map(Value::Bytes),
        DbColumnKind::Date => mysql_get::<NaiveDate>(row, idx, name)?.map(Value::Date),
        DbColumnKind::Timestamp | DbColumnKind::TimestampTz => {
            mysql_get::<NaiveDateTime>(row, idx, name)?.map(Value::TimestampNaive)
        }
        DbColumnKind::Text | DbColumnKind::Unknown => {
            mysql_get::<String>(row, idx, name)?.map(Value::String)
        }
    };
    Ok(value.unwrap_or(Value::Null))
}

fn mysql_get<T: FromValue>(row: &MySqlRow, idx: usize, name: &str) -> Result<Option<T>, DbError> {
    match row.get_opt::<Option<T>, usize>(idx) {
        Some(Ok(value)) => Ok(value),
        Some(Err(err)) => Err(DbError::Decode {
            column: name.to_string(),
            message: format!("{err:?}"),
        }),
        None => Ok(None),
    }
}

fn decimal_to_float(value: Option<f64>, name: &str) -> Result<Value, DbError> {
    value.map(Value::Float).ok_or_else(|| DbError::Decode {
        column: name.to_string(),
        message: "decimal out of float range".to_string(),
    })
}
