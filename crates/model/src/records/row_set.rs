use crate::{
    core::value::Value,
    records::{column::Column, frame::Frame},
};
use serde::Serialize;

/// Rows exactly as a driver returned them, before any dtype handling.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>) -> Self {
        RowSet {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Pivots the rows into columns, inferring each column's dtype.
    /// Short rows are padded with nulls.
    pub fn into_frame(self) -> Frame {
        let RowSet { columns, rows } = self;
        let mut buffers: Vec<Vec<Value>> = columns
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for buffer in buffers.iter_mut() {
                buffer.push(cells.next().unwrap_or(Value::Null));
            }
        }

        let columns = columns
            .iter()
            .zip(buffers)
            .map(|(name, values)| Column::inferred(name, values))
            .collect();

        Frame::from_columns(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data_type::DataType;

    #[test]
    fn test_into_frame_infers_types() {
        let mut rows = RowSet::new(vec!["id".into(), "name".into(), "score".into()]);
        rows.push(vec![
            Value::Int(1),
            Value::String("ann".into()),
            Value::Null,
        ]);
        rows.push(vec![Value::Int(2), Value::String("bob".into())]);

        let frame = rows.into_frame();
        assert_eq!(frame.num_rows(), 2);
        assert_eq!(frame.column("id").unwrap().data_type, DataType::Int64);
        assert_eq!(frame.column("name").unwrap().data_type, DataType::Object);
        assert_eq!(frame.column("score").unwrap().data_type, DataType::Null);
        assert_eq!(frame.column("score").unwrap().values, vec![Value::Null; 2]);
    }
}
