//! Domain-level errors: tree failures only, no I/O or configuration

use thiserror::Error;

use crate::domain::node::NodeId;

/// Coarse classification of a [`TreeError`], for callers that only need to
/// branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    InvalidOperation,
}

/// Errors raised by tree operations.
///
/// Every error is reported before the triggering operation mutates anything.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("invalid properties: {reason}")]
    InvalidArgument { reason: String },

    #[error("node with id {0} does not exist")]
    NotFound(NodeId),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl TreeError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidOperation(_) => ErrorKind::InvalidOperation,
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
