use crate::{commands::OutputFormat, error::CliError};
use model::{core::value::Value, records::frame::Frame};
use std::path::Path;

pub fn render(frame: &Frame, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(frame.to_string()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&records(frame))?),
        OutputFormat::Csv => to_csv(frame),
    }
}

pub async fn write_result(rendered: &str, path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(path) => tokio::fs::write(path, rendered).await?,
        None => print!("{rendered}"),
    }
    Ok(())
}

/// One JSON object per row, index columns first.
fn records(frame: &Frame) -> serde_json::Value {
    let columns: Vec<_> = frame.index.iter().chain(frame.columns.iter()).collect();
    let rows = (0..frame.num_rows())
        .map(|row| {
            let object = columns
                .iter()
                .map(|c| {
                    let value = c.get(row).map(json_value).unwrap_or(serde_json::Value::Null);
                    (c.name.clone(), value)
                })
                .collect::<serde_json::Map<_, _>>();
            serde_json::Value::Object(object)
        })
        .collect();
    serde_json::Value::Array(rows)
}

fn json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Int(v) => (*v).into(),
        Value::Int32(v) => (*v).into(),
        Value::Float(v) => serde_json::Number::from_f64(*v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Float32(v) => serde_json::Number::from_f64(f64::from(*v))
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Boolean(v) => (*v).into(),
        Value::String(v) => v.clone().into(),
        Value::Json(v) => v.clone(),
        other => other.to_string().into(),
    }
}

fn to_csv(frame: &Frame) -> Result<String, CliError> {
    let columns: Vec<_> = frame.index.iter().chain(frame.columns.iter()).collect();
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.name.as_str()))?;
    for row in 0..frame.num_rows() {
        writer.write_record(columns.iter().map(|c| match c.get(row) {
            None | Some(Value::Null) => String::new(),
            Some(value) => value.to_string(),
        }))?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{core::data_type::DataType, records::column::Column};

    fn frame() -> Frame {
        let mut frame = Frame::from_columns(vec![
            Column::new("id", DataType::Int64, vec![Value::Int(7), Value::Int(8)]),
            Column::new(
                "name",
                DataType::Object,
                vec![Value::String("ann, jr".into()), Value::Null],
            ),
        ]);
        frame.set_index(&["id".to_string()]).unwrap();
        frame
    }

    #[test]
    fn test_json_records_include_index() {
        let rendered = render(&frame(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([
                {"id": 7, "name": "ann, jr"},
                {"id": 8, "name": null},
            ])
        );
    }

    #[test]
    fn test_csv_quotes_and_blanks() {
        let rendered = render(&frame(), OutputFormat::Csv).unwrap();
        assert_eq!(rendered, "id,name\n7,\"ann, jr\"\n8,\n");
    }

    #[test]
    fn test_table_uses_frame_display() {
        let rendered = render(&frame(), OutputFormat::Table).unwrap();
        assert!(rendered.starts_with("id | name"));
    }
}
