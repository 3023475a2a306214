//! Error types for the document store

use std::io;

use thiserror::Error;

/// Errors surfaced by the store and the document mutations.
///
/// Mutations referencing an unknown day or workout id are silent no-ops and
/// never produce `NotFound`; that variant is for the presentation layer, which
/// resolves user-supplied names/ids before mutating.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data file cannot be read or written.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] io::Error),

    /// Stored JSON does not parse, does not match the document shape, or
    /// carries duplicate sibling ids.
    #[error("stored data is malformed: {0}")]
    MalformedDocument(String),

    /// User-supplied input failed validation (empty name, negative weight, ...).
    #[error("{0}")]
    Validation(String),

    /// A day or workout the user referenced does not exist.
    #[error("no {what} matching {id:?}")]
    NotFound { what: &'static str, id: String },
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }
}
