use chrono_tz::Tz;
use model::{
    core::{data_type::DataType, value::Value},
    records::{column::Column, frame::Frame},
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, PartialEq)]
pub enum TimezoneError {
    #[error("Column '{0}' holds naive timestamps; localize it before converting to {1}")]
    NaiveTimestamps(String, Tz),

    #[error("Result has no zone-aware timestamps to convert to {0}")]
    NoTemporalData(Tz),
}

/// Converts every zone-aware index and data column of `frame` to `tz`.
///
/// The frame is left untouched on error: a naive timestamp column cannot be
/// converted, and a frame without any zone-aware column has nothing to
/// convert.
pub fn convert_frame(frame: &mut Frame, tz: Tz) -> Result<(), TimezoneError> {
    let mut aware = 0;
    for column in frame.index.iter().chain(frame.columns.iter()) {
        match column.data_type {
            DataType::TimestampTz(_) => aware += 1,
            DataType::Timestamp => {
                return Err(TimezoneError::NaiveTimestamps(column.name.clone(), tz));
            }
            _ => {}
        }
    }
    if aware == 0 {
        return Err(TimezoneError::NoTemporalData(tz));
    }

    for column in frame.all_columns_mut() {
        if matches!(column.data_type, DataType::TimestampTz(_)) {
            convert_column(column, tz);
        }
    }
    info!("Converted {aware} timestamp columns to {}", tz.name());
    Ok(())
}

/// Re-expresses the zone-aware values of `column` in `tz`. The instants are
/// unchanged.
pub fn convert_column(column: &mut Column, tz: Tz) {
    debug!("Converting '{}' to {}", column.name, tz.name());
    for value in column.values.iter_mut() {
        if let Value::Timestamp(ts) = value {
            *ts = ts.with_timezone(&tz);
        }
    }
    column.data_type = DataType::TimestampTz(tz);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn utc(h: u32) -> Value {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap();
        Value::Timestamp(chrono_tz::UTC.from_utc_datetime(&naive))
    }

    #[test]
    fn test_converts_index_and_columns() {
        let mut frame = Frame::from_columns(vec![
            Column::inferred("at", vec![utc(12), Value::Null]),
            Column::inferred("seen", vec![utc(18), utc(0)]),
            Column::inferred("id", vec![Value::Int(1), Value::Int(2)]),
        ]);
        frame.set_index(&["at".to_string()]).unwrap();

        convert_frame(&mut frame, chrono_tz::America::Chicago).unwrap();

        let chicago = DataType::TimestampTz(chrono_tz::America::Chicago);
        assert_eq!(frame.index[0].data_type, chicago);
        assert_eq!(frame.column("seen").unwrap().data_type, chicago);
        assert_eq!(frame.index[0].values[0].to_string(), "2024-01-15 06:00:00-06:00");
        assert_eq!(frame.index[0].values[1], Value::Null);
        // instants are preserved
        assert_eq!(frame.get(0, "seen"), Some(&utc(18)));
    }

    #[test]
    fn test_naive_column_is_an_error() {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let mut frame = Frame::from_columns(vec![
            Column::inferred("at", vec![utc(12)]),
            Column::inferred("local", vec![Value::TimestampNaive(naive)]),
        ]);
        let before = frame.clone();

        let err = convert_frame(&mut frame, chrono_tz::Europe::Paris).unwrap_err();
        assert_eq!(
            err,
            TimezoneError::NaiveTimestamps("local".into(), chrono_tz::Europe::Paris)
        );
        assert_eq!(frame, before);
    }

    #[test]
    fn test_frame_without_timestamps_is_an_error() {
        let mut frame = Frame::from_columns(vec![Column::inferred("id", vec![Value::Int(1)])]);
        assert_eq!(
            convert_frame(&mut frame, chrono_tz::UTC).unwrap_err(),
            TimezoneError::NoTemporalData(chrono_tz::UTC)
        );
    }
}
