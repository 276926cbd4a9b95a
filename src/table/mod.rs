//! Typed in-memory table model: ordered named columns of equal length.
//!
//! This is the unit everything downstream operates on: validation rules,
//! record extraction and the report views all read through the accessors
//! here instead of poking at raw CSV cells.

pub mod infer;
mod types;

pub use types::{DataType, Value, ValueKey};

use crate::error::TableError;

/// Named column of homogeneous values.
///
/// Every non-null value must match the declared [`DataType`]; `Null` is
/// allowed anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: DataType,
    values: Vec<Value>,
}

impl Column {
    pub fn new(
        name: impl Into<String>,
        dtype: DataType,
        values: Vec<Value>,
    ) -> Result<Self, TableError> {
        let name = name.into();
        for value in &values {
            if let Some(found) = value.dtype() {
                if found != dtype {
                    return Err(TableError::ValueTypeMismatch {
                        column: name,
                        declared: dtype,
                        found,
                    });
                }
            }
        }
        Ok(Column {
            name,
            dtype,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, row: usize) -> &Value {
        &self.values[row]
    }
}

/// Ordered sequence of equal-length columns with unique names.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let rows = columns.first().map_or(0, Column::len);
        let mut seen = std::collections::HashSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(TableError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != rows {
                return Err(TableError::LengthMismatch {
                    column: column.name().to_string(),
                    expected: rows,
                    actual: column.len(),
                });
            }
        }
        Ok(Table { columns, rows })
    }

    /// A zero-row table with the given header schema.
    pub fn empty(schema: &[(&str, DataType)]) -> Table {
        let columns = schema
            .iter()
            .map(|(name, dtype)| Column {
                name: name.to_string(),
                dtype: *dtype,
                values: Vec::new(),
            })
            .collect();
        Table { columns, rows: 0 }
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Comparison key for one full row, used by duplicate-row detection.
    pub fn row_key(&self, row: usize) -> Vec<ValueKey<'_>> {
        self.columns.iter().map(|c| c.get(row).key()).collect()
    }
}
