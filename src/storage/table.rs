use std::collections::HashSet;
use std::fmt::Display;

use indexmap::IndexMap;

use super::error::EngineError;
use super::row::{Row, Value};
use super::schema::{ColumnType, Schema};

/// A table whose shape can change while it holds data.
///
/// The table owns one [`Schema`] and one row store and is the only
/// place that mutates either, so the two can never drift apart: a
/// column add/remove rewrites every row in the same call, and a row is
/// only ever pushed with exactly one value per current column.
///
/// The table itself is single-threaded on purpose. Callers that share
/// it across threads wrap it in a lock that guards schema and rows
/// together; see [`super::TableRegistry`].
pub struct DynamicTable {
    name: String,
    schema: Schema,
    rows: Vec<Row>,
}

impl DynamicTable {
    pub fn new(name: String, columns: Vec<(String, ColumnType)>) -> Result<DynamicTable, EngineError> {
        //! Create a table with the given initial columns and zero rows.
        //!
        //! The column list may be empty. Duplicate names in the initial
        //! list are rejected the same way a later add would be.

        let mut table = DynamicTable {
            name,
            schema: Schema::new(),
            rows: Vec::new(),
        };

        for (column, declared) in columns {
            table.add_column(&column, declared)?;
        }

        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_column(&mut self, column_name: &str, declared: ColumnType) -> Result<(), EngineError> {
        //! Append a column to the schema and grow every existing row by
        //! one empty cell.

        if self.schema.position(column_name).is_some() {
            return Err(EngineError::DuplicateColumn {
                table: self.name.clone(),
                column: column_name.to_string(),
            });
        }

        self.schema.push(column_name.to_string(), declared);
        for row in self.rows.iter_mut() {
            row.0.push(Value::Empty);
        }

        Ok(())
    }

    pub fn delete_column(&mut self, column_name: &str) -> Result<(), EngineError> {
        //! Remove a column from the schema and splice its cell out of
        //! every row.

        let position = self.schema.position(column_name).ok_or_else(|| {
            EngineError::ColumnNotFound {
                table: self.name.clone(),
                column: column_name.to_string(),
            }
        })?;

        self.schema.remove(position);
        for row in self.rows.iter_mut() {
            row.0.remove(position);
        }

        Ok(())
    }

    pub fn add_row(&mut self, values: &[String]) -> Result<(), EngineError> {
        //! Append a row from raw wire text, one value per column in
        //! schema order.
        //!
        //! Every value is coerced before anything is stored, so a
        //! mismatch anywhere leaves the row store untouched.

        if values.len() != self.schema.len() {
            return Err(EngineError::ArityMismatch {
                table: self.name.clone(),
                expected: self.schema.len(),
                received: values.len(),
            });
        }

        let mut row = Vec::with_capacity(values.len());
        for (raw, (column, declared)) in values.iter().zip(self.schema.columns()) {
            let value =
                Value::coerce(raw, *declared).ok_or_else(|| EngineError::TypeMismatch {
                    table: self.name.clone(),
                    column: column.clone(),
                    declared: *declared,
                    value: raw.clone(),
                })?;
            row.push(value);
        }

        self.rows.push(Row(row));
        Ok(())
    }

    pub fn add_default_row(&mut self) {
        //! Append a row where every cell is the empty sentinel. Cannot
        //! fail on a well-formed schema.

        self.rows.push(Row(vec![Value::Empty; self.schema.len()]));
    }

    pub fn remove_row(&mut self, index: usize) -> Result<Row, EngineError> {
        //! Delete the row at the 0-based `index`.
        //!
        //! Returns the removed row so callers can report what went away.

        if index >= self.rows.len() {
            return Err(EngineError::IndexOutOfRange {
                table: self.name.clone(),
                index,
                rows: self.rows.len(),
            });
        }

        Ok(self.rows.remove(index))
    }

    pub fn remove_duplicates(&mut self) -> usize {
        //! Drop every row whose rendered values match an earlier row,
        //! column by column in schema order. The first occurrence of
        //! each distinct tuple survives in place, so row order is
        //! stable and the operation is idempotent.
        //!
        //! Returns the number of rows removed.

        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let before = self.rows.len();
        self.rows.retain(|row| seen.insert(row.rendered()));
        before - self.rows.len()
    }

    pub fn update_cell(
        &mut self,
        row_index: usize,
        column_name: &str,
        raw: &str,
    ) -> Result<bool, EngineError> {
        //! Write one cell from raw wire text.
        //!
        //! A missing column or a bad row index is a hard error. A value
        //! the column type rejects is NOT: that is the routine case of a
        //! user typing something invalid into a grid cell, and comes
        //! back as `Ok(false)` with the cell unchanged.

        let position = self.schema.position(column_name).ok_or_else(|| {
            EngineError::ColumnNotFound {
                table: self.name.clone(),
                column: column_name.to_string(),
            }
        })?;

        if row_index >= self.rows.len() {
            return Err(EngineError::IndexOutOfRange {
                table: self.name.clone(),
                index: row_index,
                rows: self.rows.len(),
            });
        }

        let declared = self.schema.columns()[position].1;
        match Value::coerce(raw, declared) {
            Some(value) => {
                self.rows[row_index].0[position] = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn columns_info(&self) -> Vec<(String, ColumnType)> {
        //! Get the column layout as owned pairs, in declaration order.

        self.schema.columns().to_vec()
    }

    pub fn render_rows(&self) -> Vec<IndexMap<String, String>> {
        //! Render every row as an ordered column-name to text mapping,
        //! ready for a client grid that knows nothing about types.

        self.rows
            .iter()
            .map(|row| {
                self.schema
                    .columns()
                    .iter()
                    .zip(row.0.iter())
                    .map(|((name, _), value)| (name.clone(), value.render()))
                    .collect()
            })
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl Display for DynamicTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows: Vec<String> = self.rows.iter().map(|row| format!("{}", row)).collect();
        writeln!(f, "{}\n{}", self.schema, rows.join("\n"))
    }
}
