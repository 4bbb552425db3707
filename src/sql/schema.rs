use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    sql::types::{DataType, Row},
};

/// Table schema definition
///
/// Column order is both the display order and the positional order of every row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    /// Returns the column index for a given column name (exact, case-sensitive)
    pub fn get_col_index(&self, col_name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name == col_name)
            .ok_or_else(|| Error::UnknownColumn {
                table: self.name.clone(),
                column: col_name.to_string(),
            })
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Checks a row against the schema before it is stored.
    ///
    /// Stops at the first violation, so a rejected row never reaches storage.
    pub fn validate_row(&self, row: &Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::ColumnCountMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }

        for (col, value) in self.columns.iter().zip(row.iter()) {
            // NULL is no instance of any column type; NOT NULL columns say so first
            if value.is_null() && !col.nullable {
                return Err(Error::NotNullViolation(col.name.clone()));
            }
            if !col.datatype.accepts(value) {
                return Err(Error::TypeMismatch {
                    column: col.name.clone(),
                    expected: col.datatype,
                    got: value.type_name(),
                });
            }
        }
        Ok(())
    }
}

/// Column schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub datatype: DataType,
    pub nullable: bool,
}
