//! Error types for credential directory operations.

use thiserror::Error;

use crate::entry::Port;
use crate::store::StoreError;

/// Coarse classification of an [`AuthError`].
///
/// Callers that only care about the category of failure (for example to map
/// it onto a provider status code) can match on this instead of the full
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A caller-supplied argument was rejected.
    InvalidArgument,

    /// No record is stored for the requested port.
    PortNotFound,

    /// A stored or supplied credential set is unusable.
    InvalidAuthentication,

    /// The backing store failed.
    Store,
}

/// Error type for credential directory operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A caller-supplied argument was rejected.
    #[error("invalid argument '{field}': {message}")]
    InvalidArgument {
        field: &'static str,
        message: String,
    },

    /// No record is stored for the requested port.
    #[error("port {port} not found")]
    PortNotFound { port: Port },

    /// A stored or supplied credential set is unusable.
    #[error("invalid authentication: {message}")]
    InvalidAuthentication { message: String },

    /// The backing store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    pub(crate) fn invalid_argument(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_authentication(message: impl Into<String>) -> Self {
        Self::InvalidAuthentication {
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::PortNotFound { .. } => ErrorKind::PortNotFound,
            Self::InvalidAuthentication { .. } => ErrorKind::InvalidAuthentication,
            Self::Store(_) => ErrorKind::Store,
        }
    }
}
