//! Common error types for the Ambari client.
//!
//! These errors are raised locally, before any request reaches the server.

use thiserror::Error;

use crate::names::NameError;
use crate::state::{OperationLevel, State, StateParseError};

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while validating names, states and request envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A resource name failed validation.
    #[error("invalid name: {0}")]
    InvalidName(#[from] NameError),

    /// A state string could not be parsed.
    #[error(transparent)]
    InvalidState(#[from] StateParseError),

    /// A state-change request was built without a target state.
    #[error("state change at level {0} has no target state")]
    MissingState(OperationLevel),

    /// The requested state cannot be used as a transition target.
    #[error("{0} is not a valid transition target")]
    InvalidTarget(State),

    /// A host-component request was built without a host.
    #[error("state change at level {0} requires a host")]
    MissingHost(OperationLevel),

    /// A service-level request was given a host.
    #[error("state change at level {0} does not take a host")]
    UnexpectedHost(OperationLevel),
}
