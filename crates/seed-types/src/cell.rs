//! Normalized sheet cell values.
//!
//! Every seed sheet is read into rows of [`Cell`]s before any column-specific
//! coercion happens. The reader decides how a workbook value maps onto a
//! `Cell`; the transformer decides what a `Cell` means for a given column.

use chrono::NaiveDateTime;
use std::fmt;

/// A single value read from a seed sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// No value in the source cell.
    #[default]
    Empty,
    /// String content, kept exactly as read.
    Text(String),
    /// Integer number.
    Int(i64),
    /// Floating point number. Spreadsheet numbers usually arrive as floats
    /// even when they hold whole values.
    Float(f64),
    /// Native boolean cell.
    Bool(bool),
    /// Native date-time cell.
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// True when the cell carries no usable value: empty, or text that is
    /// empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Short name of the cell kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Empty => "empty",
            Cell::Text(_) => "text",
            Cell::Int(_) => "int",
            Cell::Float(_) => "float",
            Cell::Bool(_) => "bool",
            Cell::DateTime(_) => "datetime",
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::DateTime(value)
    }
}
