//! seed-loader
//!
//! Loads the MANAS360 seed dataset into PostgreSQL from either a SQL script or
//! an Excel workbook, then prints a validation report.
//!
//! The loading pipeline lives in the workspace crates:
//!
//! - `seed_types` - sheet rows, records and coercions
//! - `seed_source` - script and workbook readers
//! - `seed_populate_postgresql` - upserts, reset and the transactional loader
//! - `seed_verify_postgresql` - the validation report
//!
//! This crate adds connection configuration and the command line.
//!
//! # CLI Usage
//!
//! ```bash
//! # Load the SQL seed, dropping everything first
//! seed-loader script --reset
//!
//! # Load from a workbook
//! seed-loader workbook --file MANAS360_Test_Data_Complete.xlsx
//!
//! # Only print the validation report
//! seed-loader validate
//!
//! # Write .env.template
//! seed-loader env-template
//! ```

pub mod config;
pub mod connect;
pub mod env_template;
pub mod testing;

pub use config::{DbOpts, EnvFile};
pub use connect::{connect, PgConnection};
pub use env_template::{render_env_template, write_env_template};
