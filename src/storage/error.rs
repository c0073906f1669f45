use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::schema::ColumnType;

/// Everything that can go wrong inside the engine, as a closed set.
///
/// Each variant carries the identifiers its message needs, so the
/// transport can ship a (kind, message) pair without string matching on
/// the way out. A row missing a key its schema declares is NOT in this
/// list: that is a broken invariant and panics instead of being handled.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    TableAlreadyExists {
        table: String,
    },
    TableNotFound {
        table: String,
    },
    DuplicateColumn {
        table: String,
        column: String,
    },
    ColumnNotFound {
        table: String,
        column: String,
    },
    ArityMismatch {
        table: String,
        expected: usize,
        received: usize,
    },
    TypeMismatch {
        table: String,
        column: String,
        declared: ColumnType,
        value: String,
    },
    IndexOutOfRange {
        table: String,
        index: usize,
        rows: usize,
    },
}

/// The wire discriminant for an [`EngineError`].
///
/// `BadRequest` is the one extra kind the transport itself produces for
/// lines that never made it to a valid request; the engine never
/// returns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    TableAlreadyExists,
    TableNotFound,
    DuplicateColumn,
    ColumnNotFound,
    ArityMismatch,
    TypeMismatch,
    IndexOutOfRange,
    BadRequest,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::TableAlreadyExists { .. } => ErrorKind::TableAlreadyExists,
            EngineError::TableNotFound { .. } => ErrorKind::TableNotFound,
            EngineError::DuplicateColumn { .. } => ErrorKind::DuplicateColumn,
            EngineError::ColumnNotFound { .. } => ErrorKind::ColumnNotFound,
            EngineError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            EngineError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            EngineError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
        }
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::TableAlreadyExists { table } => {
                write!(f, "Table \"{}\" already exists.", table)
            }
            EngineError::TableNotFound { table } => {
                write!(f, "Table \"{}\" not found.", table)
            }
            EngineError::DuplicateColumn { table, column } => {
                write!(f, "Column \"{}\" already exists in table \"{}\".", column, table)
            }
            EngineError::ColumnNotFound { table, column } => {
                write!(f, "Column \"{}\" not found in table \"{}\".", column, table)
            }
            EngineError::ArityMismatch {
                table,
                expected,
                received,
            } => {
                write!(
                    f,
                    "Table \"{}\" expects {} value(s) per row, received {}.",
                    table, expected, received
                )
            }
            EngineError::TypeMismatch {
                table,
                column,
                declared,
                value,
            } => {
                write!(
                    f,
                    "Value \"{}\" is not valid for column \"{}\" ({}) in table \"{}\".",
                    value, column, declared, table
                )
            }
            EngineError::IndexOutOfRange { table, index, rows } => {
                write!(
                    f,
                    "Row index {} is out of range for table \"{}\" ({} row(s)).",
                    index, table, rows
                )
            }
        }
    }
}

impl std::error::Error for EngineError {}
