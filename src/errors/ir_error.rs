//! IR-related error types.

use std::fmt;

use thiserror::Error;

/// The kind of entity a lookup or insertion was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Metadata,
    Signature,
    Subgraph,
    Tensor,
    Operation,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Metadata => "metadata",
            EntityKind::Signature => "signature",
            EntityKind::Subgraph => "subgraph",
            EntityKind::Tensor => "tensor",
            EntityKind::Operation => "operation",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while querying or mutating the IR.
#[derive(Debug, Error)]
pub enum IrError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    #[error("{kind} already exists: {key}")]
    AlreadyExists { kind: EntityKind, key: String },

    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IrError {
    pub(crate) fn not_found(kind: EntityKind, key: impl fmt::Display) -> Self {
        IrError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub(crate) fn already_exists(kind: EntityKind, key: impl fmt::Display) -> Self {
        IrError::AlreadyExists {
            kind,
            key: key.to_string(),
        }
    }

    pub(crate) fn integrity(message: impl Into<String>) -> Self {
        IrError::IntegrityViolation(message.into())
    }

    /// Returns true if this is a `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, IrError::NotFound { .. })
    }

    /// Returns true if this is an `AlreadyExists` error.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, IrError::AlreadyExists { .. })
    }

    /// Returns true if this is an `IntegrityViolation` error.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, IrError::IntegrityViolation(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = IrError::not_found(EntityKind::Metadata, "min_runtime_version");
        assert_eq!(err.to_string(), "metadata not found: min_runtime_version");
        assert!(err.is_not_found());

        let err = IrError::already_exists(EntityKind::Signature, "serving_default");
        assert_eq!(err.to_string(), "signature already exists: serving_default");
        assert!(err.is_already_exists());

        let err = IrError::integrity("dangling edge");
        assert_eq!(err.to_string(), "Integrity violation: dangling edge");
        assert!(err.is_integrity_violation());
    }
}
