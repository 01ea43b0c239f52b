//! Seed sources for seed-loader.
//!
//! A seed arrives either as a SQL script that is executed verbatim, or as an
//! Excel workbook whose sheets are read row by row:
//!
//! - [`script`] - reads a SQL script into memory
//! - [`workbook`] - opens a workbook and yields typed sheet rows
//!
//! # Example
//!
//! ```ignore
//! use seed_source::{OpenedSource, SeedSource};
//! use seed_types::UserRow;
//!
//! let source = SeedSource::Workbook("MANAS360_Test_Data_Complete.xlsx".into());
//! if let OpenedSource::Workbook(mut workbook) = source.open().await? {
//!     for row in workbook.sheet::<UserRow>()? {
//!         println!("{:?}", row.id);
//!     }
//! }
//! ```

pub mod error;
pub mod script;
pub mod workbook;

pub use error::SourceError;
pub use workbook::{SheetRows, Workbook};

use std::path::{Path, PathBuf};

/// Default SQL seed script, resolved against the working directory.
pub const DEFAULT_SCRIPT: &str = "mans360_test_seed.sql";

/// Default seed workbook, resolved against the working directory.
pub const DEFAULT_WORKBOOK: &str = "MANAS360_Test_Data_Complete.xlsx";

/// Where seed data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    /// A SQL script executed as one batch.
    Script(PathBuf),
    /// An Excel workbook with the four seed sheets.
    Workbook(PathBuf),
}

/// A seed source that has been opened and is ready to load.
pub enum OpenedSource {
    Script(String),
    Workbook(Workbook),
}

impl std::fmt::Debug for OpenedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenedSource::Script(sql) => f
                .debug_tuple("Script")
                .field(&format_args!("{} bytes", sql.len()))
                .finish(),
            OpenedSource::Workbook(workbook) => f
                .debug_tuple("Workbook")
                .field(&workbook.path())
                .finish(),
        }
    }
}

impl SeedSource {
    pub fn path(&self) -> &Path {
        match self {
            SeedSource::Script(path) | SeedSource::Workbook(path) => path,
        }
    }

    /// Short name used in logs and the run banner.
    pub fn kind(&self) -> &'static str {
        match self {
            SeedSource::Script(_) => "sql-script",
            SeedSource::Workbook(_) => "workbook",
        }
    }

    /// Open the source. Fails with [`SourceError::NotFound`] before any
    /// parsing if the file is absent.
    pub async fn open(&self) -> Result<OpenedSource, SourceError> {
        let path = self.path();
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }

        match self {
            SeedSource::Script(path) => Ok(OpenedSource::Script(script::read_script(path).await?)),
            SeedSource::Workbook(path) => Ok(OpenedSource::Workbook(Workbook::open(path)?)),
        }
    }
}
