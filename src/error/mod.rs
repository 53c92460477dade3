//! Error definitions
//!
//! This module provides error types for mock-content.

use thiserror::Error;

use crate::mock::Modifier;

/// Main error type for mock-content
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A chain method outside the known set was invoked by name.
    #[error("Unknown chain method: `{0}`")]
    UnknownMethod(String),

    /// A control operation ran while no fetch was awaiting settlement.
    #[error("No request to respond to!")]
    NoPendingRequest,

    /// `find` found no record with the requested modifier.
    #[error("`{0}` is not recorded in the chain")]
    RecordNotFound(Modifier),
}

impl Error {
    /// Create an unknown method error.
    #[must_use]
    pub fn unknown_method(name: impl Into<String>) -> Self {
        Self::UnknownMethod(name.into())
    }

    /// Check whether this error reports an empty pending-request queue.
    #[must_use]
    pub fn is_no_pending_request(&self) -> bool {
        matches!(self, Self::NoPendingRequest)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
