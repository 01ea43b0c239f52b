//! Error types for the validation report.

use thiserror::Error;

/// Errors that stop a validation run before it starts.
///
/// Failures of individual checks are not errors; they are recorded in the
/// report.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// A view name is not a plain lower-case identifier.
    #[error("Invalid view name '{0}'")]
    InvalidView(String),
}
