use crate::{
    core::{error::FrameError, value::Value},
    records::column::Column,
};
use serde::Serialize;
use std::fmt;

/// An in-memory table: named, typed columns of equal length plus an optional
/// index built from promoted columns. An empty `index` means rows are
/// addressed by position.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Frame {
    pub index: Vec<Column>,
    pub columns: Vec<Column>,
}

impl Frame {
    pub fn from_columns(columns: Vec<Column>) -> Self {
        Frame {
            index: Vec::new(),
            columns,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.columns
            .first()
            .or_else(|| self.index.first())
            .map(Column::len)
            .unwrap_or(0)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn index_names(&self) -> Vec<&str> {
        self.index.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn index_column(&self, name: &str) -> Option<&Column> {
        self.index.iter().find(|c| c.name == name)
    }

    /// Index columns first, then data columns.
    pub fn all_columns_mut(&mut self) -> impl Iterator<Item = &mut Column> {
        self.index.iter_mut().chain(self.columns.iter_mut())
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.column(column)
            .or_else(|| self.index_column(column))
            .and_then(|c| c.get(row))
    }

    /// Moves the named columns, in the given order, into the index,
    /// replacing any existing index.
    pub fn set_index(&mut self, names: &[String]) -> Result<(), FrameError> {
        if let Some(missing) = names.iter().find(|n| self.column(n).is_none()) {
            return Err(FrameError::MissingColumn(missing.clone()));
        }

        let mut index = Vec::with_capacity(names.len());
        for name in names {
            if let Some(pos) = self.columns.iter().position(|c| &c.name == name) {
                index.push(self.columns.remove(pos));
            }
        }
        self.index = index;
        Ok(())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<&Column> = self.index.iter().chain(self.columns.iter()).collect();
        if headers.is_empty() {
            return writeln!(f, "(empty frame)");
        }

        let rows = self.num_rows();
        let cells: Vec<Vec<String>> = headers
            .iter()
            .map(|c| c.values.iter().map(|v| v.to_string()).collect())
            .collect();
        let widths: Vec<usize> = headers
            .iter()
            .zip(&cells)
            .map(|(c, col_cells)| {
                col_cells
                    .iter()
                    .map(|s| s.chars().count())
                    .chain(std::iter::once(c.name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write_row(f, headers.iter().map(|c| c.name.as_str()).collect(), &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        for row in 0..rows {
            let items = cells
                .iter()
                .map(|col| col.get(row).map(String::as_str).unwrap_or(""))
                .collect();
            write_row(f, items, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, items: Vec<&str>, widths: &[usize]) -> fmt::Result {
    let rendered: Vec<String> = items
        .iter()
        .zip(widths)
        .map(|(item, width)| format!("{item:<width$}"))
        .collect();
    writeln!(f, "{}", rendered.join(" | ").trim_end())
}
