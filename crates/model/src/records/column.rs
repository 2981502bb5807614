use crate::core::{data_type::DataType, value::Value};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: &str, data_type: DataType, values: Vec<Value>) -> Self {
        Column {
            name: name.to_string(),
            data_type,
            values,
        }
    }

    /// Builds a column whose dtype is inferred from its values.
    pub fn inferred(name: &str, values: Vec<Value>) -> Self {
        let data_type = DataType::infer(&values);
        Column::new(name, data_type, values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }
}
