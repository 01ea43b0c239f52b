//! Post-load validation for seed-loader.
//!
//! Runs a fixed battery of aggregate queries and view row counts and renders
//! them as a text report. A failing check becomes a warning line in the
//! report; the remaining checks still run.
//!
//! # Example
//!
//! ```ignore
//! use seed_verify_postgresql::Verifier;
//!
//! let report = Verifier::new(&client).run().await?;
//! print!("{report}");
//! ```

pub mod checks;
pub mod error;
pub mod report;
pub mod verifier;

pub use checks::{Check, CHECKS, VIEWS};
pub use error::VerifyError;
pub use report::{CheckKind, CheckOutcome, ValidationReport};
pub use verifier::Verifier;
