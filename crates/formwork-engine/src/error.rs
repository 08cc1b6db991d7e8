//! Error types for form engine operations.
//!
//! Validation failure is deliberately absent here: it is a first-class
//! result ([`crate::Validation::Invalid`]) stored in engine state, never
//! an error.

use formwork_state::StateError;
use thiserror::Error;

/// Result type alias for form engine operations.
pub type FormResult<T> = Result<T, FormError>;

/// Errors that can occur during form engine operations.
#[derive(Debug, Error)]
pub enum FormError {
    /// A document write faulted (bad index, type mismatch).
    #[error(transparent)]
    State(#[from] StateError),

    /// An operation that requires initialized state ran before
    /// initialization completed.
    #[error("form engine is not initialized")]
    NotInitialized,

    /// A caller-supplied submit handler, async update, or async
    /// initializer rejected.
    #[error("handler failed: {message}")]
    Handler {
        /// Description of the failure, as reported by the handler.
        message: String,
    },
}

impl FormError {
    /// Create a handler failure error.
    #[inline]
    pub fn handler(message: impl Into<String>) -> Self {
        FormError::Handler {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_state::path;

    #[test]
    fn test_state_error_passes_through() {
        let err: FormError = StateError::path_not_found(path!("a", "b")).into();
        assert_eq!(err.to_string(), "path not found: $.a.b");
    }

    #[test]
    fn test_handler_error_display() {
        let err = FormError::handler("network unreachable");
        assert_eq!(err.to_string(), "handler failed: network unreachable");
    }
}
