use std::fmt::Display;

use bincode::ErrorKind;

use crate::sql::types::DataType;

/// Custom Result type for MiniDB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for MiniDB
///
/// None of these are fatal: the session reports the message and keeps going.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A clause is missing an expected keyword or delimiter
    MalformedClause(String),
    UnknownTable(String),
    UnknownColumn { table: String, column: String },
    ColumnCountMismatch { expected: usize, got: usize },
    TypeMismatch {
        column: String,
        expected: DataType,
        got: &'static str,
    },
    NotNullViolation(String),
    /// The query matched none of the supported statement shapes
    UnsupportedQuery,
    UnknownAggregateFunction(String),
    NoNumericData,
    /// Internal error (storage, serialization, etc.)
    Internal(String),
}

impl From<Box<ErrorKind>> for Error {
    fn from(value: Box<ErrorKind>) -> Self {
        Error::Internal(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Internal(value.to_string())
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedClause(msg) => write!(f, "{}", msg),
            Error::UnknownTable(table) => write!(f, "Table '{}' does not exist.", table),
            Error::UnknownColumn { table, column } => {
                write!(f, "Column '{}' not found in table '{}'", column, table)
            }
            Error::ColumnCountMismatch { expected, got } => {
                write!(f, "Column count mismatch. Expected {}, got {}", expected, got)
            }
            Error::TypeMismatch {
                column,
                expected,
                got,
            } => write!(
                f,
                "Type mismatch: Expected {} for '{}', got {}",
                expected, column, got
            ),
            Error::NotNullViolation(column) => {
                write!(f, "NOT NULL constraint violated for column '{}'", column)
            }
            Error::UnsupportedQuery => write!(f, "Unsupported query."),
            Error::UnknownAggregateFunction(func) => {
                write!(f, "Unknown aggregate function '{}'", func)
            }
            Error::NoNumericData => write!(f, "No numeric data to aggregate."),
            Error::Internal(err) => write!(f, "internal error {}", err),
        }
    }
}
