//! Error types for reconciliation.

use larder_core::errors::{CoreError, StoreError};

/// Setup failures that stop a reconciliation run before any item is processed.
///
/// Per-item failures are never errors: they are counted and reported as
/// warnings in [`crate::ImportReport`].
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The local store could not be read while building the name indices.
    #[error("Failed to load local {entity_type} records: {source}")]
    Preload {
        entity_type: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SyncError {
    pub(crate) fn preload(entity_type: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Preload {
            entity_type,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preload_error_names_entity_type() {
        let err = SyncError::preload("allergen")(StoreError::Backend("disk full".into()));
        assert_eq!(
            err.to_string(),
            "Failed to load local allergen records: store backend error: disk full"
        );
    }
}
