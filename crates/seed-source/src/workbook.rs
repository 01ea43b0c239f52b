//! Excel workbook reader.
//!
//! Each seed sheet has a header in its first row and one record per row after
//! that. Cells are read positionally and handed to a [`SheetRow`] type, which
//! names them. Rows whose key cell is blank are skipped and counted.

use crate::error::SourceError;
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use seed_types::{Cell, SheetRow};
use std::fs::File;
use std::io::BufReader;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An opened seed workbook.
pub struct Workbook {
    path: PathBuf,
    inner: Sheets<BufReader<File>>,
}

impl Workbook {
    /// Open a workbook. The format (xlsx, xlsm, xls, ods) follows the extension.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let inner = open_workbook_auto(path).map_err(|source| SourceError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Opened workbook {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    /// Read the sheet for row type `R`.
    pub fn sheet<R: SheetRow>(&mut self) -> Result<SheetRows<R>, SourceError> {
        let names = self.inner.sheet_names();
        if !names.iter().any(|name| name == R::SHEET) {
            return Err(SourceError::MissingSheet {
                sheet: R::SHEET.to_string(),
                available: names.join(", "),
            });
        }

        let range = self
            .inner
            .worksheet_range(R::SHEET)
            .map_err(|source| SourceError::Workbook {
                path: self.path.clone(),
                source,
            })?;

        SheetRows::from_range(range)
    }
}

/// Iterator over the data rows of one sheet.
///
/// Yields rows with a non-blank key in sheet order. [`SheetRows::read`] and
/// [`SheetRows::skipped`] report progress so far.
pub struct SheetRows<R> {
    range: Range<Data>,
    next_row: u32,
    last_row: u32,
    read: usize,
    skipped: usize,
    _row: PhantomData<R>,
}

impl<R: SheetRow> SheetRows<R> {
    /// Wrap a sheet range. Row 0 is the header and is never yielded.
    pub fn from_range(range: Range<Data>) -> Result<Self, SourceError> {
        let last_row = match range.end() {
            Some((last_row, last_col)) if last_row >= 1 => {
                let found = last_col as usize + 1;
                if found < R::WIDTH {
                    return Err(SourceError::SheetTooNarrow {
                        sheet: R::SHEET.to_string(),
                        expected: R::WIDTH,
                        found,
                    });
                }
                last_row
            }
            _ => 0,
        };

        Ok(Self {
            range,
            next_row: 1,
            last_row,
            read: 0,
            skipped: 0,
            _row: PhantomData,
        })
    }

    /// Rows yielded so far.
    pub fn read(&self) -> usize {
        self.read
    }

    /// Rows passed over because their key cell was blank.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn cells(&self, row: u32) -> Vec<Cell> {
        (0..R::WIDTH as u32)
            .map(|col| {
                self.range
                    .get_value((row, col))
                    .map(cell_from_data)
                    .unwrap_or_default()
            })
            .collect()
    }
}

impl<R: SheetRow> Iterator for SheetRows<R> {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        while self.next_row <= self.last_row {
            let row_index = self.next_row;
            self.next_row += 1;

            let row = R::from_cells(self.cells(row_index));
            if row.key().is_blank() {
                debug!("{}: skipping row {} with blank key", R::SHEET, row_index + 1);
                self.skipped += 1;
                continue;
            }

            self.read += 1;
            return Some(row);
        }
        None
    }
}

/// Normalize a calamine cell.
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::DateTime(value),
            None => Cell::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}
