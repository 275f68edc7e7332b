use crate::error::{CondFormatError, Result};
use serde_json::{Map, Value};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// An ordered collection of row records (column name -> raw value), as
/// handed over by the data-fetch layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowTable {
    rows: Vec<Map<String, Value>>,
}

impl RowTable {
    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        Self { rows }
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Array(elements) => {
                let rows = elements
                    .iter()
                    .map(|element| match element {
                        Value::Object(row) => Ok(row.clone()),
                        _ => Err(CondFormatError::specification(format!(
                            "Expected an object row, received: {element}"
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self { rows })
            }
            _ => Err(CondFormatError::specification(format!(
                "Expected an array of rows, received: {value}"
            ))),
        }
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Numeric values of `column` in row order. Cells that are missing or not
    /// representable as f64 are skipped.
    pub fn numeric_column(&self, column: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter_map(Value::as_f64)
            .collect()
    }

    /// Raw values of `column` in row order, with missing cells as `Null`.
    pub fn column(&self, column: &str) -> Vec<&Value> {
        self.rows
            .iter()
            .map(|row| row.get(column).unwrap_or(&Value::Null))
            .collect()
    }

    /// Stable content hash, usable as a cache key by callers that re-ingest
    /// equal data into fresh allocations. Row serialization preserves key
    /// order, so equal tables hash equal.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for row in &self.rows {
            for (column, value) in row {
                column.hash(&mut hasher);
                value.to_string().hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}
