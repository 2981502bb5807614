use model::core::data_type::DbColumnKind;
use mysql_async::{Column, consts::ColumnType};

/// Character set id MySQL reports for binary string/blob columns.
const BINARY_CHARSET: u16 = 63;

pub(crate) fn mysql_column_kind(column: &Column) -> DbColumnKind {
    use ColumnType::*;

    match column.column_type() {
        MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_YEAR => DbColumnKind::SmallInteger,
        MYSQL_TYPE_LONG | MYSQL_TYPE_INT24 | MYSQL_TYPE_LONGLONG => DbColumnKind::Integer,
        MYSQL_TYPE_FLOAT | MYSQL_TYPE_DOUBLE => DbColumnKind::Real,
        MYSQL_TYPE_DECIMAL | MYSQL_TYPE_NEWDECIMAL => DbColumnKind::Decimal,
        MYSQL_TYPE_DATE | MYSQL_TYPE_NEWDATE => DbColumnKind::Date,
        MYSQL_TYPE_DATETIME | MYSQL_TYPE_DATETIME2 | MYSQL_TYPE_TIMESTAMP
        | MYSQL_TYPE_TIMESTAMP2 => DbColumnKind::Timestamp,
        MYSQL_TYPE_JSON => DbColumnKind::Json,
        MYSQL_TYPE_BIT | MYSQL_TYPE_GEOMETRY => DbColumnKind::Binary,
        MYSQL_TYPE_TINY_BLOB
        | MYSQL_TYPE_MEDIUM_BLOB
        | MYSQL_TYPE_LONG_BLOB
        | MYSQL_TYPE_BLOB
        | MYSQL_TYPE_VAR_STRING
        | MYSQL_TYPE_STRING
        | MYSQL_TYPE_VARCHAR => {
            if column.character_set() == BINARY_CHARSET {
                DbColumnKind::Binary
            } else {
                DbColumnKind::Text
            }
        }
        MYSQL_TYPE_ENUM | MYSQL_TYPE_SET => DbColumnKind::Text,
        _ => DbColumnKind::Unknown,
    }
}
