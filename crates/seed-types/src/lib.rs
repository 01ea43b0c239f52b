//! Seed data types for seed-loader.
//!
//! This crate holds everything between a raw sheet row and a database write:
//!
//! - [`cell`] - normalized source values
//! - [`rows`] - named row types for the four seed sheets
//! - [`transform`] - per-column coercions
//! - [`records`] - typed entity records and their column-ordered parameters
//! - [`value`] - bind values that adapt to the target column type
//!
//! # Example
//!
//! ```ignore
//! use seed_types::{Cell, Record, SheetRow, UserRecord, UserRow};
//!
//! let row = UserRow::from_cells(vec![Cell::text("USR-PAT-001"), Cell::text("patient")]);
//! let record = UserRecord::try_from(row)?;
//! let params = record.into_params();
//! assert_eq!(params.len(), UserRecord::COLUMNS.len());
//! ```

pub mod cell;
pub mod records;
pub mod rows;
pub mod transform;
pub mod value;

pub use cell::Cell;
pub use records::{Record, SessionRecord, SubscriptionRecord, UserRecord, WalletRecord};
pub use rows::{SessionRow, SheetRow, SubscriptionRow, UserRow, WalletRow};
pub use transform::TransformError;
pub use value::{SqlValue, SqlValueError};
