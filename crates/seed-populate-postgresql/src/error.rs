//! Error types for the PostgreSQL seed loader.

use crate::loader::LoadState;
use seed_source::SourceError;
use seed_types::TransformError;
use thiserror::Error;

/// Errors that can occur while resetting or loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// PostgreSQL connection, transaction or batch error.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(tokio_postgres::Error),

    /// The seed source could not be read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A source row could not be converted into a record.
    #[error("{table} row '{key}': {error}")]
    Transform {
        table: &'static str,
        key: String,
        error: TransformError,
    },

    /// The database rejected a record.
    #[error("Failed to write {table} row '{key}': {error}")]
    Write {
        table: &'static str,
        key: String,
        error: tokio_postgres::Error,
    },

    /// A reset statement failed.
    #[error("Reset failed at `{statement}`: {error}")]
    Reset {
        statement: String,
        error: tokio_postgres::Error,
    },

    /// An identifier outside the reset whitelist was offered for a drop.
    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// The loader was asked to do something its current state does not allow.
    #[error("Cannot move from {from} to {to}")]
    InvalidState { from: LoadState, to: LoadState },
}

// Not `#[from]`: the message already carries the database error.
impl From<tokio_postgres::Error> for LoaderError {
    fn from(error: tokio_postgres::Error) -> Self {
        LoaderError::PostgreSQL(error)
    }
}
