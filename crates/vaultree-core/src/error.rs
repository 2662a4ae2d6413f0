//! Error types for backend calls and node operations.

use compact_str::CompactString;
use thiserror::Error;

use crate::identity::{Identity, StoreAddress};
use crate::kind::NodeKind;

/// Errors returned by a store or directory collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The store could not be reached or the call failed.
    #[error("Store unavailable: {store}: {message}")]
    Unavailable {
        store: StoreAddress,
        message: String,
    },

    /// The path no longer exists (typically deleted out-of-band).
    #[error("Not found: {store}{path}")]
    NotFound {
        store: StoreAddress,
        path: CompactString,
    },

    /// The target path is already taken.
    #[error("Already exists: {store}{path}")]
    AlreadyExists {
        store: StoreAddress,
        path: CompactString,
    },

    /// A directory cannot be moved or copied into its own subtree.
    #[error("Cannot place {store}{source_path} inside itself at {target}")]
    IntoOwnSubtree {
        store: StoreAddress,
        source_path: CompactString,
        target: CompactString,
    },
}

impl BackendError {
    /// Create an unavailable error.
    pub fn unavailable(store: StoreAddress, message: impl Into<String>) -> Self {
        Self::Unavailable {
            store,
            message: message.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(store: StoreAddress, path: impl Into<CompactString>) -> Self {
        Self::NotFound {
            store,
            path: path.into(),
        }
    }

    /// Check if this is a stale-identity error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for collaborator calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors returned by node operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A backend call failed; propagated unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The operation does not apply to this kind of node.
    #[error("Cannot {operation} a {kind}")]
    Unsupported {
        operation: &'static str,
        kind: NodeKind,
    },

    /// A rename or create was given an unusable name.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A cross-store move skipped unreplicated entries, so the source was kept.
    #[error("Transfer of {identity} skipped {skipped} unreplicated entries; source kept")]
    IncompleteTransfer { identity: Identity, skipped: usize },
}

impl TreeError {
    /// Create an unsupported-operation error.
    pub fn unsupported(operation: &'static str, kind: NodeKind) -> Self {
        Self::Unsupported { operation, kind }
    }
}

/// Result alias for node operations.
pub type TreeResult<T> = Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_converts() {
        let err: TreeError = BackendError::not_found(StoreAddress::new("dweb://a"), "/x").into();
        assert!(matches!(err, TreeError::Backend(ref e) if e.is_not_found()));
        assert_eq!(err.to_string(), "Not found: dweb://a/x");
    }

    #[test]
    fn test_unsupported_message() {
        let err = TreeError::unsupported("rename", NodeKind::StoreRoot);
        assert_eq!(err.to_string(), "Cannot rename a store-root");
    }
}
