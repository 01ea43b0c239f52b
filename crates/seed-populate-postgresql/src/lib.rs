//! PostgreSQL seed loader.
//!
//! This crate writes seed data into PostgreSQL:
//!
//! - [`upsert`] - per-entity conflict policies and upsert statements
//! - [`reset`] - whitelisted drop statements for a destructive reset
//! - [`loader`] - the transactional [`SeedLoader`]
//!
//! # Example
//!
//! ```ignore
//! use seed_populate_postgresql::SeedLoader;
//! use seed_source::SeedSource;
//!
//! let source = SeedSource::Workbook("MANAS360_Test_Data_Complete.xlsx".into()).open().await?;
//! let mut loader = SeedLoader::new(&mut client);
//! loader.reset().await?;
//! let summary = loader.load(source).await?;
//! println!("{summary}");
//! ```

pub mod error;
pub mod loader;
pub mod reset;
pub mod upsert;

pub use error::LoaderError;
pub use loader::{EntityCount, LoadState, LoadSummary, SeedLoader};
pub use reset::{drop_statement, DropKind, RESET_TABLES, RESET_TYPES};
pub use upsert::{upsert_sql, ConflictPolicy, EntityWrite, SeedEntity};
