//! Error types for seed sources.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening or reading a seed source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The seed file does not exist.
    #[error("Seed file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The seed file exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workbook could not be parsed.
    #[error("Failed to open workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// A required sheet is absent from the workbook.
    #[error("Sheet '{sheet}' not found in workbook (available: {available})")]
    MissingSheet { sheet: String, available: String },

    /// A sheet has data rows but fewer columns than its layout requires.
    #[error("Sheet '{sheet}' has {found} columns, expected at least {expected}")]
    SheetTooNarrow {
        sheet: String,
        expected: usize,
        found: usize,
    },
}
