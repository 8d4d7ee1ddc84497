//! Cross-cutting error types for Larder.
//!
//! Domain-specific errors (`SyncError`, `PosError`, `ConfigError`) live in
//! their respective crates. The binary converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Larder crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised by a [`crate::store::LocalStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with the same name already exists.
    #[error("{entity_type} '{name}' already exists")]
    Duplicate { entity_type: String, name: String },

    /// A referenced record does not exist.
    #[error("{entity_type} {id} does not exist")]
    MissingReference { entity_type: String, id: String },

    /// The record was rejected by the store.
    #[error("rejected {entity_type}: {reason}")]
    Rejected { entity_type: String, reason: String },

    /// The backing storage failed (I/O, poisoned lock, remote call).
    #[error("store backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
